//! Players as the space race sees them: a name to announce and a ship.

use crate::{config::PlayerConfig, spaceship::PlayerSpaceship, types::PlayerId};

#[derive(Debug, Clone)]
pub struct Player {
    pub id:            PlayerId,
    pub name:          String,
    /// Plural nation name used in announcements ("the Romans").
    pub nation_plural: String,
    pub alive:         bool,
    pub spaceship:     PlayerSpaceship,
}

impl Player {
    pub fn from_config(id: PlayerId, config: &PlayerConfig) -> Self {
        Self {
            id,
            name:          config.name.clone(),
            nation_plural: config.nation_plural.clone(),
            alive:         true,
            spaceship:     PlayerSpaceship::new(),
        }
    }
}
