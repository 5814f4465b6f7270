//! The generative backend seam.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::BrainError;

/// A generative-language backend: one prompt in, one completion out.
///
/// No streaming. Implementations report rate limiting as
/// [`BrainError::RateLimited`] so callers can degrade instead of retrying.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generate a completion for the full prompt text.
    async fn generate(&self, prompt: &str) -> Result<String, BrainError>;

    /// Get a human-readable name for this backend.
    fn name(&self) -> &str;
}

#[async_trait]
impl<G: Generator + ?Sized> Generator for Arc<G> {
    async fn generate(&self, prompt: &str) -> Result<String, BrainError> {
        (**self).generate(prompt).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
