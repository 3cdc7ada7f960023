//! Storage error types.

use thiserror::Error;

use warden_core::RuleError;

/// Errors that can occur in storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Database error from rusqlite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error (e.g., creating directories, replacing the document).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A mutation was rejected by rule validation.
    #[error("validation error: {0}")]
    Validation(#[from] RuleError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;
