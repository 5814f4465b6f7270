//! Prompt assembly and fingerprinting.

use sha2::{Digest, Sha256};

/// Builds a single prompt string out of blank-line separated sections.
///
/// Empty sections are dropped so optional parts (an empty transcript, a
/// missing attachment note) never leave stray blank blocks.
///
/// ```rust
/// use brain_core::PromptBuilder;
///
/// let prompt = PromptBuilder::new()
///     .section("You are a stew-loving bot.")
///     .section("")
///     .section("Steve said: hello")
///     .build();
/// assert_eq!(prompt, "You are a stew-loving bot.\n\nSteve said: hello");
/// ```
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder {
    sections: Vec<String>,
}

impl PromptBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a section. Whitespace-only sections are ignored.
    pub fn section(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            self.sections.push(trimmed.to_string());
        }
        self
    }

    /// Append a section only when present.
    pub fn optional_section(self, text: Option<impl Into<String>>) -> Self {
        match text {
            Some(text) => self.section(text),
            None => self,
        }
    }

    /// Number of non-empty sections.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Whether no section has been added.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Join all sections.
    pub fn build(self) -> String {
        self.sections.join("\n\n")
    }
}

/// Compute a stable SHA-256 fingerprint for a prompt string.
pub fn hash_prompt(prompt: &str) -> String {
    let digest = Sha256::digest(prompt.as_bytes());
    digest.iter().map(|byte| format!("{:02x}", byte)).collect()
}
