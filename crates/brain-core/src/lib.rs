//! Core traits and types for the nikorihito persona bot.
//!
//! This crate provides the shared interface between the chat transport,
//! the persona and the generative backends. It defines:
//!
//! - [`Brain`] - Turns an inbound chat message into a reply
//! - [`Generator`] - A generative-language backend (`prompt -> text`)
//! - [`SpeechSynthesizer`] - Optional text-to-speech backend
//! - [`InboundMessage`] / [`OutboundMessage`] - Message types for input/output
//! - [`BrainError`] - Error types, including rate-limit classification
//!
//! # Example
//!
//! ```rust
//! use brain_core::{async_trait, BrainError, Generator};
//!
//! struct Parrot;
//!
//! #[async_trait]
//! impl Generator for Parrot {
//!     async fn generate(&self, prompt: &str) -> Result<String, BrainError> {
//!         Ok(prompt.to_string())
//!     }
//!
//!     fn name(&self) -> &str {
//!         "Parrot"
//!     }
//! }
//! ```

mod error;
mod generator;
mod message;
mod prompt;
mod speech;
mod trait_def;

pub use error::BrainError;
pub use generator::Generator;
pub use message::{InboundAttachment, InboundMessage, OutboundMessage};
pub use prompt::{hash_prompt, PromptBuilder};
pub use speech::SpeechSynthesizer;
pub use trait_def::Brain;

// Re-export async_trait for convenience
pub use async_trait::async_trait;
