//! Configuration for PersonaBrain.

use std::env;
use std::time::Duration;

use brain_core::BrainError;

/// Configuration for PersonaBrain.
#[derive(Debug, Clone)]
pub struct PersonaConfig {
    /// Upper bound on one generative call.
    pub backend_timeout: Duration,
    /// Turns kept per user in the history document.
    pub history_retention: usize,
    /// Turns included in each prompt.
    pub prompt_history: usize,
}

impl Default for PersonaConfig {
    fn default() -> Self {
        Self {
            backend_timeout: Duration::from_secs(30),
            history_retention: 100,
            prompt_history: 6,
        }
    }
}

impl PersonaConfig {
    /// Load configuration from environment variables.
    ///
    /// Optional env vars:
    /// - `NIKORI_BACKEND_TIMEOUT_SECS` (default: 30)
    /// - `NIKORI_HISTORY_RETENTION` (default: 100)
    /// - `NIKORI_PROMPT_HISTORY` (default: 6)
    pub fn from_env() -> Result<Self, BrainError> {
        let defaults = Self::default();

        let backend_timeout = match parse_positive("NIKORI_BACKEND_TIMEOUT_SECS")? {
            Some(secs) => Duration::from_secs(secs as u64),
            None => defaults.backend_timeout,
        };
        let history_retention =
            parse_positive("NIKORI_HISTORY_RETENTION")?.unwrap_or(defaults.history_retention);
        let prompt_history =
            parse_positive("NIKORI_PROMPT_HISTORY")?.unwrap_or(defaults.prompt_history);

        Ok(Self {
            backend_timeout,
            history_retention: history_retention.max(prompt_history),
            prompt_history,
        })
    }
}

fn parse_positive(key: &str) -> Result<Option<usize>, BrainError> {
    match env::var(key) {
        Ok(raw) => match raw.trim().parse::<usize>() {
            Ok(value) if value > 0 => Ok(Some(value)),
            _ => Err(BrainError::Configuration(format!(
                "{} must be a positive integer, got {:?}",
                key, raw
            ))),
        },
        Err(_) => Ok(None),
    }
}
