//! Inbound and outbound message types.

use std::path::PathBuf;

/// An attachment on an inbound chat message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InboundAttachment {
    /// Public URL of the attachment.
    pub url: String,
    /// Original filename, if the platform reports one.
    pub filename: Option<String>,
    /// MIME type, if the platform reports one.
    pub content_type: Option<String>,
}

impl InboundAttachment {
    /// Create an attachment from its URL.
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }
}

/// A message addressed to the bot.
#[derive(Debug, Clone, Default)]
pub struct InboundMessage {
    /// Stable platform user id of the author.
    pub sender: String,
    /// Display name of the author at the time of the message.
    pub display_name: String,
    /// Message text with platform mention tokens removed.
    pub text: String,
    /// Message timestamp (milliseconds since epoch).
    pub timestamp: u64,
    /// Channel the message arrived in. `None` for direct messages.
    pub channel_id: Option<String>,
    /// Attachments included with the message.
    pub attachments: Vec<InboundAttachment>,
}

impl InboundMessage {
    /// Create a direct message from a user.
    pub fn direct(sender: impl Into<String>, text: impl Into<String>, timestamp: u64) -> Self {
        let sender = sender.into();
        Self {
            display_name: sender.clone(),
            sender,
            text: text.into(),
            timestamp,
            ..Default::default()
        }
    }

    /// Create a message posted in a channel.
    pub fn in_channel(
        sender: impl Into<String>,
        text: impl Into<String>,
        timestamp: u64,
        channel_id: impl Into<String>,
    ) -> Self {
        Self {
            channel_id: Some(channel_id.into()),
            ..Self::direct(sender, text, timestamp)
        }
    }

    /// Set the author's display name.
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = name.into();
        self
    }

    /// Add an attachment.
    pub fn with_attachment(mut self, attachment: InboundAttachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    /// Whether the message carries attachments.
    pub fn has_attachments(&self) -> bool {
        !self.attachments.is_empty()
    }

    /// Whether this message was sent directly to the bot.
    pub fn is_direct(&self) -> bool {
        self.channel_id.is_none()
    }
}

/// A reply produced by a [`Brain`](crate::Brain).
#[derive(Debug, Clone, Default)]
pub struct OutboundMessage {
    /// Channel id, or user id when `is_direct` is set.
    pub recipient: String,
    /// Reply text.
    pub text: String,
    /// Whether the reply goes to a user's direct-message channel.
    pub is_direct: bool,
    /// BCP-47 language of the reply, used for speech synthesis.
    pub language_code: Option<String>,
    /// Optional file to upload with the reply.
    pub attachment: Option<PathBuf>,
}

impl OutboundMessage {
    /// Create a reply routed back to where `message` came from.
    pub fn reply_to(message: &InboundMessage, text: impl Into<String>) -> Self {
        match &message.channel_id {
            Some(channel_id) => Self {
                recipient: channel_id.clone(),
                text: text.into(),
                is_direct: false,
                ..Default::default()
            },
            None => Self {
                recipient: message.sender.clone(),
                text: text.into(),
                is_direct: true,
                ..Default::default()
            },
        }
    }

    /// Tag the reply with its language.
    pub fn with_language(mut self, language_code: impl Into<String>) -> Self {
        self.language_code = Some(language_code.into());
        self
    }

    /// Attach a file to the reply.
    pub fn with_attachment(mut self, path: impl Into<PathBuf>) -> Self {
        self.attachment = Some(path.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_to_channel_message() {
        let msg = InboundMessage::in_channel("42", "hello", 1, "900");
        let reply = OutboundMessage::reply_to(&msg, "hi");

        assert_eq!(reply.recipient, "900");
        assert!(!reply.is_direct);
    }

    #[test]
    fn test_reply_to_direct_message() {
        let msg = InboundMessage::direct("42", "hello", 1);
        let reply = OutboundMessage::reply_to(&msg, "hi").with_language("ja-JP");

        assert_eq!(reply.recipient, "42");
        assert!(reply.is_direct);
        assert_eq!(reply.language_code.as_deref(), Some("ja-JP"));
    }

    #[test]
    fn test_display_name_defaults_to_sender() {
        let msg = InboundMessage::direct("42", "hello", 1);
        assert_eq!(msg.display_name, "42");

        let msg = msg.with_display_name("Steve");
        assert_eq!(msg.display_name, "Steve");
    }
}
