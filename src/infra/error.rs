//! Error type for the simulation library

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("failed to serialize feature result: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;
