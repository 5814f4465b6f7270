//! The Brain trait definition.

use async_trait::async_trait;

use crate::error::BrainError;
use crate::message::{InboundMessage, OutboundMessage};

/// Turns a chat message addressed to the bot into the reply to post.
///
/// The listener holds one brain for the life of the process; a brain is
/// free to swallow backend failures and answer with a fallback line.
#[async_trait]
pub trait Brain: Send + Sync {
    async fn process(&self, message: InboundMessage) -> Result<OutboundMessage, BrainError>;

    /// Name used in logs.
    fn name(&self) -> &str;

    /// Called once when the listener stops.
    async fn shutdown(&self) -> Result<(), BrainError> {
        Ok(())
    }
}
