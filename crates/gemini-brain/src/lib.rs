//! Google Gemini generative backend.
//!
//! This crate provides the production [`Generator`] used by the persona:
//! one prompt in, one completion out, over the Gemini `generateContent`
//! REST endpoint. Quota exhaustion (HTTP 429 / `RESOURCE_EXHAUSTED`) is
//! reported as [`BrainError::RateLimited`] so the persona can fall back to
//! its fatigue lines instead of retrying.
//!
//! It also ships [`GoogleSpeech`], an optional [`SpeechSynthesizer`] backed by
//! the Google Cloud Text-to-Speech REST API.
//!
//! # Usage
//!
//! ```rust,no_run
//! use gemini_brain::{GeminiBrain, Generator};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let brain = GeminiBrain::from_env()?;
//!     let text = brain.generate("Say hello in one word.").await?;
//!     println!("{}", text);
//!     Ok(())
//! }
//! ```

mod api_types;
mod brain;
mod config;
mod speech;

pub use brain::GeminiBrain;
pub use config::{GeminiBrainConfig, GeminiBrainConfigBuilder};
pub use speech::{GoogleSpeech, GoogleSpeechConfig};

// Re-export brain-core types for convenience
pub use brain_core::{async_trait, BrainError, Generator, SpeechSynthesizer};
