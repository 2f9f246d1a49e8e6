use crate::{
    error::{SimError, SimResult},
    types::Year,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarConfig {
    /// Year of the first turn. Negative is BC.
    pub start_year: Year,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpaceRaceConfig {
    /// When false, built parts are ignored and the calendar never
    /// slows down for spaceship technology.
    pub enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    pub name:          String,
    pub nation_plural: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    pub calendar:  CalendarConfig,
    pub spacerace: SpaceRaceConfig,
    /// Join order; a player's id is its index here.
    pub players:   Vec<PlayerConfig>,
}

impl SimConfig {
    /// Load from the data/ directory.
    /// In tests, use SimConfig::default_test().
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let path = format!("{data_dir}/game.json");
        let content = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: SimConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> SimResult<()> {
        if self.players.is_empty() {
            return Err(SimError::Config("at least one player is required".into()));
        }
        let mut seen = HashSet::new();
        for p in &self.players {
            if !seen.insert(p.name.as_str()) {
                return Err(SimError::Config(format!("duplicate player name: {}", p.name)));
            }
        }
        Ok(())
    }

    /// Config with hardcoded defaults for use in unit tests.
    /// Four players, space race on, starting in 1900 AD so every
    /// turn advances exactly one year.
    pub fn default_test() -> Self {
        let player = |name: &str, nation: &str| PlayerConfig {
            name:          name.into(),
            nation_plural: nation.into(),
        };
        Self {
            calendar:  CalendarConfig { start_year: 1900 },
            spacerace: SpaceRaceConfig { enabled: true },
            players:   vec![
                player("Caesar", "Romans"),
                player("Hammurabi", "Babylonians"),
                player("Ramesses", "Egyptians"),
                player("Tokugawa", "Japanese"),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_test_config_is_valid() {
        SimConfig::default_test().validate().unwrap();
    }

    #[test]
    fn duplicate_names_rejected() {
        let mut config = SimConfig::default_test();
        config.players[1].name = config.players[0].name.clone();
        assert!(matches!(config.validate(), Err(SimError::Config(_))));
    }

    #[test]
    fn empty_player_list_rejected() {
        let mut config = SimConfig::default_test();
        config.players.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn parses_game_json_shape() {
        let json = r#"{
            "calendar":  { "start_year": -4000 },
            "spacerace": { "enabled": false },
            "players":   [ { "name": "Lincoln", "nation_plural": "Americans" } ]
        }"#;
        let config: SimConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.calendar.start_year, -4000);
        assert!(!config.spacerace.enabled);
        assert_eq!(config.players[0].nation_plural, "Americans");
    }

    #[test]
    fn shipped_data_dir_loads() {
        let dir = concat!(env!("CARGO_MANIFEST_DIR"), "/../data");
        let config = SimConfig::load(dir).unwrap();
        assert_eq!(config.players.len(), 4);
    }

    #[test]
    fn missing_data_dir_is_an_error() {
        assert!(SimConfig::load("/nonexistent/spacerace-data").is_err());
    }
}
