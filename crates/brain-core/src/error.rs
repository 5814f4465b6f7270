//! Error types for brain and backend operations.

use thiserror::Error;

/// Substrings that mark a backend failure as a quota or rate-limit condition.
const QUOTA_MARKERS: &[&str] = &["quota", "exceeded", "resource_exhausted", "rate limit"];

/// Errors that can occur while generating a reply.
#[derive(Debug, Error)]
pub enum BrainError {
    /// The backend refused the request because a quota or rate limit was hit.
    #[error("rate limited: {0}")]
    RateLimited(String),

    /// The brain is temporarily unavailable.
    #[error("brain unavailable: {0}")]
    Unavailable(String),

    /// The message could not be processed.
    #[error("processing failed: {0}")]
    ProcessingFailed(String),

    /// Transport-level failure talking to the backend.
    #[error("network error: {0}")]
    Network(String),

    /// Missing or invalid configuration.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The brain has been shut down.
    #[error("brain shut down")]
    ShutDown,

    /// A timeout occurred during processing.
    #[error("processing timed out")]
    Timeout,
}

impl BrainError {
    /// Whether this failure is a quota/rate-limit signal.
    ///
    /// Explicit [`BrainError::RateLimited`] always counts. Other variants count
    /// when their message mentions a quota marker, since some backends only
    /// report exhaustion in the error text.
    pub fn is_quota(&self) -> bool {
        match self {
            BrainError::RateLimited(_) => true,
            BrainError::Timeout | BrainError::ShutDown => false,
            other => {
                let text = other.to_string().to_lowercase();
                QUOTA_MARKERS.iter().any(|marker| text.contains(marker))
            }
        }
    }
}
