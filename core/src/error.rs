use crate::types::PlayerId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Config(String),

    #[error("Unknown player {player}")]
    UnknownPlayer { player: PlayerId },

    #[error("Invalid {class} capacity: {requested} exceeds {max} slots")]
    InvalidCapacity {
        class:     &'static str,
        requested: u32,
        max:       u32,
    },

    #[error("Game is over")]
    GameOver,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type SimResult<T> = Result<T, SimError>;
