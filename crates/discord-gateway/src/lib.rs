//! Discord gateway client library.
//!
//! This crate connects the bot to Discord using serenity and exposes a small
//! platform-neutral surface:
//!
//! - An [`EventStream`] of inbound [`GatewayEvent`]s (ready, messages, slash commands)
//! - A [`DiscordClient`] for channel messages (with an optional file) and DMs
//! - Slash-command registration on connect
//!
//! # Example
//!
//! ```no_run
//! use discord_gateway::{DiscordGateway, GatewayConfig, GatewayEvent};
//! use futures::StreamExt;
//!
//! # async fn example() -> Result<(), discord_gateway::GatewayError> {
//! let config = GatewayConfig::from_env()?;
//! let (gateway, client, mut events) = DiscordGateway::connect(config).await?;
//! tokio::spawn(gateway.run());
//!
//! while let Some(event) = events.next().await {
//!     if let GatewayEvent::Message(msg) = event {
//!         if msg.mentions_bot && !msg.author_is_bot {
//!             client.send_to_channel(&msg.channel_id, "hi!", None).await?;
//!         }
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod commands;
pub mod config;
pub mod error;
pub mod gateway;
pub mod types;

pub use client::{parse_id, split_message, DiscordClient, MAX_MESSAGE_CHARS};
pub use commands::{command_specs, CommandSpec, OptionKind, OptionSpec};
pub use config::GatewayConfig;
pub use error::{GatewayError, Result};
pub use gateway::{event_channel, DiscordGateway, EventStream, ShutdownHandle};
pub use types::{ChatMessage, CommandInvocation, CommandValue, GatewayEvent};

/// Crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
