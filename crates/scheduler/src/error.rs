//! Error types for the scheduler.

use database::DatabaseError;
use thiserror::Error;

/// Errors that can occur while scheduling.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Invalid configuration value.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The store could not be read or written.
    #[error("Store error: {0}")]
    Store(#[from] DatabaseError),
}

/// Result type for scheduler operations.
pub type Result<T> = std::result::Result<T, SchedulerError>;
