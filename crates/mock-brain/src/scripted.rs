//! Scripted generator - plays back queued outcomes and records prompts.

use std::collections::VecDeque;
use std::sync::Mutex;

use brain_core::{async_trait, BrainError, Generator};

/// A generator that answers from a queue of prepared outcomes.
///
/// Every prompt it receives is recorded so tests can assert on prompt
/// contents. When the queue runs dry, calls fail with
/// [`BrainError::Unavailable`].
#[derive(Debug, Default)]
pub struct ScriptedGenerator {
    outcomes: Mutex<VecDeque<Result<String, BrainError>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    /// Create an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful reply.
    pub fn push_reply(&self, reply: impl Into<String>) -> &Self {
        self.push(Ok(reply.into()))
    }

    /// Queue a failure.
    pub fn push_error(&self, error: BrainError) -> &Self {
        self.push(Err(error))
    }

    fn push(&self, outcome: Result<String, BrainError>) -> &Self {
        self.outcomes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push_back(outcome);
        self
    }

    /// All prompts received so far, oldest first.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// The most recent prompt, if any.
    pub fn last_prompt(&self) -> Option<String> {
        self.prompts().pop()
    }
}

#[async_trait]
impl Generator for ScriptedGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, BrainError> {
        self.prompts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(prompt.to_string());

        self.outcomes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front()
            .unwrap_or_else(|| Err(BrainError::Unavailable("script exhausted".to_string())))
    }

    fn name(&self) -> &str {
        "ScriptedGenerator"
    }
}
