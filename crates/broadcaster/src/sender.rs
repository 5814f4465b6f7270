//! Message sender abstraction.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use discord_gateway::DiscordClient;

use crate::Error;

/// Trait for sending messages to the chat platform.
#[async_trait]
pub trait MessageSender: Send + Sync {
    /// Send a message to a channel, optionally with a file.
    async fn send_to_channel(
        &self,
        channel_id: &str,
        text: &str,
        attachment: Option<&Path>,
    ) -> Result<(), Error>;

    /// Send a direct message to a user.
    async fn send_direct_message(&self, user_id: &str, text: &str) -> Result<(), Error>;
}

#[async_trait]
impl MessageSender for DiscordClient {
    async fn send_to_channel(
        &self,
        channel_id: &str,
        text: &str,
        attachment: Option<&Path>,
    ) -> Result<(), Error> {
        DiscordClient::send_to_channel(self, channel_id, text, attachment)
            .await
            .map_err(Error::from)
    }

    async fn send_direct_message(&self, user_id: &str, text: &str) -> Result<(), Error> {
        DiscordClient::send_direct_message(self, user_id, text)
            .await
            .map_err(Error::from)
    }
}

#[async_trait]
impl<S: MessageSender + ?Sized> MessageSender for Arc<S> {
    async fn send_to_channel(
        &self,
        channel_id: &str,
        text: &str,
        attachment: Option<&Path>,
    ) -> Result<(), Error> {
        (**self).send_to_channel(channel_id, text, attachment).await
    }

    async fn send_direct_message(&self, user_id: &str, text: &str) -> Result<(), Error> {
        (**self).send_direct_message(user_id, text).await
    }
}

/// A no-op message sender for testing.
#[derive(Debug, Clone, Default)]
pub struct NoOpSender;

#[async_trait]
impl MessageSender for NoOpSender {
    async fn send_to_channel(&self, _: &str, _: &str, _: Option<&Path>) -> Result<(), Error> {
        Ok(())
    }

    async fn send_direct_message(&self, _: &str, _: &str) -> Result<(), Error> {
        Ok(())
    }
}

/// A logging message sender for debugging that logs all operations.
#[derive(Debug, Clone, Default)]
pub struct LoggingSender;

#[async_trait]
impl MessageSender for LoggingSender {
    async fn send_to_channel(
        &self,
        channel_id: &str,
        text: &str,
        attachment: Option<&Path>,
    ) -> Result<(), Error> {
        tracing::info!(
            "[channel] Sending to {} (attachment: {:?}): {}",
            channel_id,
            attachment,
            text
        );
        Ok(())
    }

    async fn send_direct_message(&self, user_id: &str, text: &str) -> Result<(), Error> {
        tracing::info!("[direct] Sending to {}: {}", user_id, text);
        Ok(())
    }
}

/// A sent message captured by [`RecordingSender`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub recipient: String,
    pub text: String,
    pub is_direct: bool,
    pub attachment: Option<PathBuf>,
}

/// Records every message; deliveries to selected recipients fail.
#[derive(Debug, Default)]
pub struct RecordingSender {
    sent: Mutex<Vec<SentMessage>>,
    failing: Mutex<HashSet<String>>,
}

impl RecordingSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every send to `recipient` fail.
    pub fn fail_for(&self, recipient: impl Into<String>) -> &Self {
        self.failing
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(recipient.into());
        self
    }

    /// Messages sent so far, in order.
    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn record(&self, message: SentMessage) -> Result<(), Error> {
        let failing = self
            .failing
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(&message.recipient);
        if failing {
            return Err(Error::Send(format!("{} is unreachable", message.recipient)));
        }
        self.sent
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(message);
        Ok(())
    }
}

#[async_trait]
impl MessageSender for RecordingSender {
    async fn send_to_channel(
        &self,
        channel_id: &str,
        text: &str,
        attachment: Option<&Path>,
    ) -> Result<(), Error> {
        self.record(SentMessage {
            recipient: channel_id.to_string(),
            text: text.to_string(),
            is_direct: false,
            attachment: attachment.map(Path::to_path_buf),
        })
    }

    async fn send_direct_message(&self, user_id: &str, text: &str) -> Result<(), Error> {
        self.record(SentMessage {
            recipient: user_id.to_string(),
            text: text.to_string(),
            is_direct: true,
            attachment: None,
        })
    }
}
