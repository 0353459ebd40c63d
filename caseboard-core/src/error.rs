//! Error types for caseboard.

use thiserror::Error;

/// Errors that can occur in schedule and backup operations.
///
/// Malformed schedule lines are never errors: the parser drops them.
#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Backup not found: {0}")]
    BackupNotFound(String),

    /// Failure reported by a `KvStore` backend
    #[error("Store error: {0}")]
    Store(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for ScheduleError {
    fn from(err: serde_json::Error) -> Self {
        ScheduleError::Serialization(err.to_string())
    }
}

/// Result type alias for caseboard operations.
pub type ScheduleResult<T> = Result<T, ScheduleError>;
