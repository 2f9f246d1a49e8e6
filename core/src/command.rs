use serde::{Deserialize, Serialize};
use crate::{
    spaceship::{PartClass, PartType},
    types::PlayerId,
};

/// All commands the engine accepts.
/// Variants are appended, never removed or reordered.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum GameCommand {
    // ── Player-issued ─────────────────────────────
    SpaceshipAction {
        player:  PlayerId,
        request: ActionRequest,
    },

    // ── Server-issued (production, conquest, connections) ──
    SpacePartBuilt {
        player: PlayerId,
        part:   PartClass,
    },
    SpacePartUnlocked {
        part: PartClass,
    },
    CapitalCaptured {
        player: PlayerId,
    },
    PlayerRemoved {
        player: PlayerId,
    },
    SyncShips {
        player: PlayerId,
    },
}

impl GameCommand {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::SpaceshipAction { .. }   => "spaceship_action",
            Self::SpacePartBuilt { .. }    => "space_part_built",
            Self::SpacePartUnlocked { .. } => "space_part_unlocked",
            Self::CapitalCaptured { .. }   => "capital_captured",
            Self::PlayerRemoved { .. }     => "player_removed",
            Self::SyncShips { .. }         => "sync_ships",
        }
    }
}

/// A spaceship request exactly as a client sends it: an action code
/// and a slot or sequence number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRequest {
    pub action: u8,
    pub num:    i32,
}

pub const ACT_LAUNCH: u8 = 0;
pub const ACT_PLACE_STRUCTURAL: u8 = 1;
pub const ACT_PLACE_FUEL: u8 = 2;
pub const ACT_PLACE_PROPULSION: u8 = 3;
pub const ACT_PLACE_HABITATION: u8 = 4;
pub const ACT_PLACE_LIFE_SUPPORT: u8 = 5;
pub const ACT_PLACE_SOLAR_PANELS: u8 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpaceshipAction {
    Launch,
    PlaceStructural { slot: i32 },
    PlacePart { part: PartType, num: i32 },
}

impl ActionRequest {
    pub fn launch() -> Self {
        Self { action: ACT_LAUNCH, num: 0 }
    }

    pub fn structural(slot: i32) -> Self {
        Self { action: ACT_PLACE_STRUCTURAL, num: slot }
    }

    pub fn part(part: PartType, num: i32) -> Self {
        let action = match part {
            PartType::Fuel        => ACT_PLACE_FUEL,
            PartType::Propulsion  => ACT_PLACE_PROPULSION,
            PartType::Habitation  => ACT_PLACE_HABITATION,
            PartType::LifeSupport => ACT_PLACE_LIFE_SUPPORT,
            PartType::SolarPanels => ACT_PLACE_SOLAR_PANELS,
        };
        Self { action, num }
    }

    /// None for an action code this server does not know.
    pub fn decode(&self) -> Option<SpaceshipAction> {
        let part = |part| Some(SpaceshipAction::PlacePart { part, num: self.num });
        match self.action {
            ACT_LAUNCH             => Some(SpaceshipAction::Launch),
            ACT_PLACE_STRUCTURAL   => Some(SpaceshipAction::PlaceStructural { slot: self.num }),
            ACT_PLACE_FUEL         => part(PartType::Fuel),
            ACT_PLACE_PROPULSION   => part(PartType::Propulsion),
            ACT_PLACE_HABITATION   => part(PartType::Habitation),
            ACT_PLACE_LIFE_SUPPORT => part(PartType::LifeSupport),
            ACT_PLACE_SOLAR_PANELS => part(PartType::SolarPanels),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders_decode_back() {
        assert_eq!(ActionRequest::launch().decode(), Some(SpaceshipAction::Launch));
        assert_eq!(
            ActionRequest::structural(5).decode(),
            Some(SpaceshipAction::PlaceStructural { slot: 5 })
        );
        assert_eq!(
            ActionRequest::part(PartType::SolarPanels, 2).decode(),
            Some(SpaceshipAction::PlacePart { part: PartType::SolarPanels, num: 2 })
        );
    }

    #[test]
    fn unknown_code_does_not_decode() {
        assert_eq!(ActionRequest { action: 42, num: 1 }.decode(), None);
    }

    #[test]
    fn command_json_shape() {
        let json = r#"{"cmd":"spaceship_action","player":1,"request":{"action":2,"num":1}}"#;
        let cmd: GameCommand = serde_json::from_str(json).unwrap();
        assert!(matches!(
            cmd,
            GameCommand::SpaceshipAction { player: 1, request: ActionRequest { action: 2, num: 1 } }
        ));
    }
}
