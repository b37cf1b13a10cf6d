//! Error types for the quiz engine.

use thiserror::Error;

/// Result type for quiz operations.
pub type QuizResult<T> = Result<T, QuizError>;

/// Errors that can occur while playing or configuring a quiz.
#[derive(Debug, Error)]
pub enum QuizError {
    /// A configuration value was rejected before any state changed.
    #[error("invalid {field}: {message}")]
    Validation {
        /// The settings field that was rejected.
        field: &'static str,
        /// Message suitable for showing next to the field.
        message: String,
    },

    /// A guess arrived while no target was selected.
    #[error("no active target")]
    NoActiveTarget,

    /// A guess named a region that is not part of the session.
    #[error("unknown region: {0}")]
    UnknownRegion(String),

    /// The storage backend could not be read or written.
    #[error("persistence unavailable: {0}")]
    PersistenceUnavailable(#[from] StorageError),

    /// The region dataset could not be parsed.
    #[error("malformed region dataset: {0}")]
    Dataset(String),
}

impl QuizError {
    /// Build a validation error for a settings field.
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }
}

/// Failures of a key-value storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored document could not be encoded or decoded.
    #[error("malformed document: {0}")]
    Json(#[from] serde_json::Error),

    /// The key cannot be mapped onto the backend.
    #[error("invalid storage key: \"{0}\"")]
    InvalidKey(String),
}
