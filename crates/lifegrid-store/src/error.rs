//! Error types for the board repository and its backends.

use lifegrid_core::CoreError;
use thiserror::Error;

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in the repository and its backends.
///
/// Cache errors exist as a variant so backends can report them, but the
/// repository treats the cache tier as advisory and never propagates them
/// to callers.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A seed matrix failed validation at the conversion boundary.
    #[error("invalid board: {0}")]
    InvalidBoard(#[from] CoreError),

    /// A generation index below 1 was requested.
    #[error("generation must be >= 1 (got {value})")]
    InvalidGeneration { value: u64 },

    /// No board record exists for the given identifier.
    #[error("board not found: {board_id}")]
    NotFound { board_id: String },

    /// The durable backend failed or is unreachable.
    #[error("durable backend error: {message}")]
    Backend { message: String },

    /// The shared cache failed or is unreachable.
    #[error("cache error: {message}")]
    Cache { message: String },

    /// A persisted record could not be turned back into a board.
    #[error("compute error: {message}")]
    Compute { message: String },

    /// Serialisation of a record or cache payload failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    /// Shorthand for a durable-backend failure.
    pub fn backend(message: impl Into<String>) -> Self {
        StoreError::Backend {
            message: message.into(),
        }
    }

    /// Shorthand for a cache failure.
    pub fn cache(message: impl Into<String>) -> Self {
        StoreError::Cache {
            message: message.into(),
        }
    }
}
