use thiserror::Error;

use crate::domain::ports::message_channel::SendError;
use crate::domain::ports::posting_source::FetchError;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Fetch error from {source_name}: {error}")]
    Fetch {
        source_name: String,
        error: FetchError,
    },

    #[error("Send error: {0}")]
    Send(#[from] SendError),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("A cycle is already running")]
    CycleInProgress,
}

impl From<rusqlite::Error> for DomainError {
    fn from(e: rusqlite::Error) -> Self {
        DomainError::Persistence(e.to_string())
    }
}
