use thiserror::Error;

use crate::types::ItemsetLength;

pub type Result<T> = std::result::Result<T, Error>;

/// Fatal conditions of a mining run. None of them are retryable.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Rejected configuration or database, detected before any level is processed.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The caller's cancellation token fired before `level` was processed.
    #[error("mining cancelled before level {level}")]
    Cancelled { level: ItemsetLength },
}
