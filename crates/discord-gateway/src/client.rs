//! Outbound Discord client.

use std::path::Path;
use std::sync::Arc;

use serenity::all::{ChannelId, CreateAttachment, CreateMessage, Http, UserId};
use tracing::{debug, info};

use crate::error::{GatewayError, Result};

/// Discord rejects messages longer than this many characters.
pub const MAX_MESSAGE_CHARS: usize = 2000;

/// Sends messages to channels and users over the Discord REST API.
#[derive(Clone)]
pub struct DiscordClient {
    http: Arc<Http>,
}

impl DiscordClient {
    /// Create a client from a bot token.
    pub fn new(token: &str) -> Self {
        Self::from_http(Arc::new(Http::new(token)))
    }

    /// Wrap an existing HTTP client.
    pub fn from_http(http: Arc<Http>) -> Self {
        Self { http }
    }

    /// The underlying HTTP client.
    pub fn http(&self) -> &Arc<Http> {
        &self.http
    }

    /// Send `text` to a channel, attaching `file` to the last chunk if given.
    pub async fn send_to_channel(
        &self,
        channel_id: &str,
        text: &str,
        file: Option<&Path>,
    ) -> Result<()> {
        let channel = ChannelId::new(parse_id(channel_id)?);
        let chunks = split_message(text);
        let last = chunks.len().saturating_sub(1);

        for (i, chunk) in chunks.into_iter().enumerate() {
            let mut builder = CreateMessage::new().content(chunk);
            if i == last {
                if let Some(path) = file {
                    builder = builder.add_file(CreateAttachment::path(path).await?);
                }
            }
            channel.send_message(&self.http, builder).await?;
        }

        debug!("Sent message to channel {}", channel_id);
        Ok(())
    }

    /// Send `text` as a direct message to a user.
    pub async fn send_direct_message(&self, user_id: &str, text: &str) -> Result<()> {
        let user = UserId::new(parse_id(user_id)?);
        let dm = user.create_dm_channel(&self.http).await?;

        for chunk in split_message(text) {
            dm.id.say(&self.http, chunk).await?;
        }

        info!("Sent direct message to {}", user_id);
        Ok(())
    }
}

/// Parse a Discord snowflake.
pub fn parse_id(raw: &str) -> Result<u64> {
    raw.trim()
        .parse::<u64>()
        .ok()
        .filter(|id| *id != 0)
        .ok_or_else(|| GatewayError::InvalidId(raw.to_string()))
}

/// Split text into chunks Discord accepts, preferring line breaks.
pub fn split_message(text: &str) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for line in text.split_inclusive('\n') {
        let line_len = line.chars().count();
        if current_len + line_len <= MAX_MESSAGE_CHARS {
            current.push_str(line);
            current_len += line_len;
            continue;
        }

        if !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }

        // A single line longer than the limit is cut at char boundaries.
        let mut chars = line.chars().peekable();
        while chars.peek().is_some() {
            let piece: String = chars.by_ref().take(MAX_MESSAGE_CHARS).collect();
            let piece_len = piece.chars().count();
            if piece_len == MAX_MESSAGE_CHARS {
                chunks.push(piece);
            } else {
                current = piece;
                current_len = piece_len;
            }
        }
    }

    if !current.is_empty() || chunks.is_empty() {
        chunks.push(current);
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("123456789012345678").unwrap(), 123456789012345678);
        assert!(matches!(parse_id("abc"), Err(GatewayError::InvalidId(_))));
        assert!(parse_id("0").is_err());
    }

    #[test]
    fn test_split_short_message() {
        assert_eq!(split_message("hello"), vec!["hello"]);
        assert_eq!(split_message(""), vec![""]);
    }

    #[test]
    fn test_split_prefers_line_breaks() {
        let line = format!("{}\n", "あ".repeat(1500));
        let text = format!("{}{}", line, line);

        let chunks = split_message(&text);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0], line);
        assert!(chunks.iter().all(|c| c.chars().count() <= MAX_MESSAGE_CHARS));
    }

    #[test]
    fn test_split_long_line() {
        let text = "x".repeat(4500);
        let chunks = split_message(&text);

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[2].len(), 500);
        assert_eq!(chunks.concat(), text);
    }
}
