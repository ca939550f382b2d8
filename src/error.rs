//! Error types for tavern-ai
//!
//! The decision core never fails: unsimulatable actions, stale plans and
//! "nothing worth doing" are ordinary outcomes. These errors belong to the
//! reference engine, the match harness and configuration loading.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TavernError {
    #[error("Entity not found: {0}")]
    EntityNotFound(u32),

    #[error("Invalid game action: {0}")]
    InvalidAction(String),

    #[error("Game is already over")]
    GameOver,

    #[error("Unknown deck: {0}")]
    UnknownDeck(String),

    #[error("Unknown agent: {0}")]
    UnknownAgent(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TavernError>;
