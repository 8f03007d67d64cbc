//! Error types for the cycle-detection driver.

use thiserror::Error;

/// Result type alias for detector operations.
pub type DetectorResult<T> = Result<T, DetectorError>;

/// Errors that can occur during a detector run.
#[derive(Debug, Error)]
pub enum DetectorError {
    /// The attempt ceiling must be a positive integer.
    #[error("invalid max attempts: {value} (must be >= 1)")]
    InvalidMaxAttempts { value: u64 },

    /// The progress sink rejected an event; the run aborts.
    #[error("progress sink rejected generation {generation}: {message}")]
    ProgressAborted { generation: u64, message: String },
}
