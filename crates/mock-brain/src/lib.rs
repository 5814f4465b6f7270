//! Mock generative backends for the nikorihito reply pipeline.
//!
//! This crate provides mock implementations of the `Generator` trait:
//! - `EchoGenerator` - Echoes the prompt, or always returns a canned reply
//! - `ScriptedGenerator` - Plays back a queue of replies/errors and records prompts
//! - `FailingGenerator` - Always fails with a quota or generic error
//! - `DelayedGenerator` - Wraps another generator with artificial delay
//!
//! For production use, see the `gemini-brain` crate.
//!
//! # Example
//!
//! ```rust
//! use mock_brain::{EchoGenerator, Generator};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), mock_brain::BrainError> {
//!     let backend = EchoGenerator::replying("hi there");
//!     let text = backend.generate("hello").await?;
//!     assert_eq!(text, "hi there");
//!     Ok(())
//! }
//! ```

mod delayed;
mod echo;
mod failing;
mod scripted;

// Re-export brain-core types for convenience
pub use brain_core::{async_trait, BrainError, Generator};

pub use delayed::DelayedGenerator;
pub use echo::EchoGenerator;
pub use failing::{FailureKind, FailingGenerator};
pub use scripted::ScriptedGenerator;
