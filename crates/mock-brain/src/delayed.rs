//! Delayed generator - wraps another generator with artificial delay.

use std::time::Duration;

use brain_core::{async_trait, BrainError, Generator};
use tokio::time::sleep;

/// A generator that waits before delegating to another generator.
///
/// Useful for exercising backend timeouts.
pub struct DelayedGenerator<G: Generator> {
    inner: G,
    delay: Duration,
}

impl<G: Generator> DelayedGenerator<G> {
    /// Wrap `inner` with the given delay.
    pub fn new(inner: G, delay: Duration) -> Self {
        Self { inner, delay }
    }

    /// Wrap `inner` with a delay in milliseconds.
    pub fn with_millis(inner: G, millis: u64) -> Self {
        Self::new(inner, Duration::from_millis(millis))
    }
}

#[async_trait]
impl<G: Generator> Generator for DelayedGenerator<G> {
    async fn generate(&self, prompt: &str) -> Result<String, BrainError> {
        sleep(self.delay).await;
        self.inner.generate(prompt).await
    }

    fn name(&self) -> &str {
        "DelayedGenerator"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EchoGenerator;
    use std::time::Instant;

    #[tokio::test]
    async fn test_delayed_generator() {
        let backend = DelayedGenerator::with_millis(EchoGenerator::new(), 50);

        let start = Instant::now();
        let text = backend.generate("test").await.unwrap();

        assert_eq!(text, "test");
        assert!(start.elapsed() >= Duration::from_millis(50));
        assert_eq!(backend.name(), "DelayedGenerator");
    }
}
