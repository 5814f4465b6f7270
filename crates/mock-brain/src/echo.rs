//! Echo generator - returns the prompt or a canned reply.

use brain_core::{async_trait, BrainError, Generator};

/// A generator that echoes the prompt back, or always answers with a canned reply.
#[derive(Debug, Clone, Default)]
pub struct EchoGenerator {
    reply: Option<String>,
}

impl EchoGenerator {
    /// Create a generator that returns the prompt unchanged.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a generator that always returns `reply`.
    pub fn replying(reply: impl Into<String>) -> Self {
        Self {
            reply: Some(reply.into()),
        }
    }
}

#[async_trait]
impl Generator for EchoGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, BrainError> {
        Ok(match &self.reply {
            Some(reply) => reply.clone(),
            None => prompt.to_string(),
        })
    }

    fn name(&self) -> &str {
        "EchoGenerator"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_echo_prompt() {
        let backend = EchoGenerator::new();
        assert_eq!(backend.generate("hello").await.unwrap(), "hello");
    }

    #[tokio::test]
    async fn test_canned_reply() {
        let backend = EchoGenerator::replying("hi there");
        assert_eq!(backend.generate("anything").await.unwrap(), "hi there");
        assert_eq!(backend.name(), "EchoGenerator");
    }
}
