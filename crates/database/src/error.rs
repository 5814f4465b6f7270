//! Database error types.

use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Filesystem error (read, temp file, rename).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Document could not be encoded or decoded.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Document was written by a newer version of the bot.
    #[error("{document} has unsupported schema version {version}")]
    UnsupportedSchema { document: String, version: String },

    /// The blocking write task panicked or was cancelled.
    #[error("write task failed: {0}")]
    Task(String),
}

/// Result type for database operations.
pub type Result<T> = std::result::Result<T, DatabaseError>;
