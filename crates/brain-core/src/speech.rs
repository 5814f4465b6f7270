//! Optional text-to-speech seam.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::BrainError;

/// Turns reply text into an audio file that can be attached to a message.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize `text` in the given BCP-47 language (e.g. `ja-JP`).
    ///
    /// Returns the path of the written audio file.
    async fn synthesize(&self, text: &str, language_code: &str) -> Result<PathBuf, BrainError>;
}
