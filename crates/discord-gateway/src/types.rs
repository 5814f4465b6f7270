//! Platform-neutral event types.

use std::collections::HashMap;

use tokio::sync::oneshot;

/// A chat message seen by the bot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub author_id: String,
    pub display_name: String,
    pub channel_id: String,
    pub content: String,
    /// Attachment URLs.
    pub attachments: Vec<String>,
    /// The bot is mentioned in the message.
    pub mentions_bot: bool,
    /// The author is a bot (including this one).
    pub author_is_bot: bool,
}

/// Value of a slash-command option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandValue {
    String(String),
    Bool(bool),
}

/// A slash-command invocation awaiting a reply.
#[derive(Debug)]
pub struct CommandInvocation {
    pub name: String,
    pub user_id: String,
    /// Mention markup for the invoking user, e.g. `<@123>`.
    pub user_mention: String,
    pub options: HashMap<String, CommandValue>,
    reply: Option<oneshot::Sender<String>>,
}

impl CommandInvocation {
    /// Create an invocation and the receiver its reply will arrive on.
    pub fn new(
        name: impl Into<String>,
        user_id: impl Into<String>,
        options: HashMap<String, CommandValue>,
    ) -> (Self, oneshot::Receiver<String>) {
        let (tx, rx) = oneshot::channel();
        let user_id = user_id.into();
        let invocation = Self {
            name: name.into(),
            user_mention: format!("<@{}>", user_id),
            user_id,
            options,
            reply: Some(tx),
        };
        (invocation, rx)
    }

    /// Send the reply. Returns `false` if it was already sent or nobody is
    /// waiting any more.
    pub fn respond(&mut self, text: impl Into<String>) -> bool {
        match self.reply.take() {
            Some(tx) => tx.send(text.into()).is_ok(),
            None => false,
        }
    }
}

/// Inbound gateway event.
#[derive(Debug)]
pub enum GatewayEvent {
    /// Connected; carries the bot's own user id.
    Ready { bot_id: String },
    Message(ChatMessage),
    Command(CommandInvocation),
}
