//! Error types for discord-gateway.

use thiserror::Error;

/// Errors that can occur when talking to Discord.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Error from the Discord client library.
    #[error("Discord error: {0}")]
    Serenity(#[from] serenity::Error),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// An id that is not a Discord snowflake.
    #[error("Invalid id: {0}")]
    InvalidId(String),

    /// Message sending failed.
    #[error("Send failed: {0}")]
    SendFailed(String),
}

/// Result type for gateway operations.
pub type Result<T> = std::result::Result<T, GatewayError>;
