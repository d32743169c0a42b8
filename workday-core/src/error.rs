//! Error types for the workday service.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur in workday operations.
#[derive(Error, Debug)]
pub enum WorkdayError {
    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    InvalidTask(String),

    #[error("{0}")]
    TaskFull(String),

    #[error("Invalid request payload: {0}")]
    InvalidPayload(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to access {}: {source}", .path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Notification error: {0}")]
    Notification(String),

    #[error("Notifier '{0}' not found in PATH")]
    NotifierNotInstalled(String),

    #[error("Notifier timed out after {0}s")]
    NotifierTimeout(u64),
}

impl WorkdayError {
    /// True for errors caused by the caller's input rather than the server.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            WorkdayError::InvalidTask(_)
                | WorkdayError::TaskFull(_)
                | WorkdayError::InvalidPayload(_)
        )
    }
}

/// Result type alias for workday operations.
pub type WorkdayResult<T> = Result<T, WorkdayError>;
