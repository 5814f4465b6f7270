//! Failing generator - simulates backend outages.

use std::sync::atomic::{AtomicUsize, Ordering};

use brain_core::{async_trait, BrainError, Generator};

/// Which kind of failure a [`FailingGenerator`] reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Quota exhausted / rate limited.
    Quota,
    /// Any other backend failure.
    Generic,
}

/// A generator whose every call fails.
#[derive(Debug)]
pub struct FailingGenerator {
    kind: FailureKind,
    calls: AtomicUsize,
}

impl FailingGenerator {
    /// Fail every call with a rate-limit error.
    pub fn quota() -> Self {
        Self::new(FailureKind::Quota)
    }

    /// Fail every call with a generic processing error.
    pub fn generic() -> Self {
        Self::new(FailureKind::Generic)
    }

    /// Fail every call with the given kind of error.
    pub fn new(kind: FailureKind) -> Self {
        Self {
            kind,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Generator for FailingGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, BrainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(match self.kind {
            FailureKind::Quota => {
                BrainError::RateLimited("429 Resource has been exhausted (check quota)".to_string())
            }
            FailureKind::Generic => {
                BrainError::ProcessingFailed("API error (500): internal error".to_string())
            }
        })
    }

    fn name(&self) -> &str {
        "FailingGenerator"
    }
}
