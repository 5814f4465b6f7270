//! Inbound message pipeline for nikorihito.
//!
//! [`MessageProcessor`] consumes the gateway's event stream. Chat messages
//! that mention the bot go through the mute and self filters, get their
//! mention tokens stripped and attachment markers appended, and are passed
//! to a [`Brain`](brain_core::Brain); the reply is posted back to the same
//! channel, with synthesized speech attached when available. Slash commands
//! are parsed and answered through the persona's command handler.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use database::Database;
//! use discord_gateway::{DiscordGateway, GatewayConfig};
//! use message_listener::{MessageProcessor, ProcessorConfig};
//! use mock_brain::EchoGenerator;
//! use persona_brain::{FatigueLadder, PersonaBrain, PersonaConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Arc::new(Database::open("data")?);
//! let brain = PersonaBrain::new(
//!     EchoGenerator::new(),
//!     db.clone(),
//!     Arc::new(FatigueLadder::new()),
//!     PersonaConfig::default(),
//! );
//!
//! let (gateway, client, events) = DiscordGateway::connect(GatewayConfig::from_env()?).await?;
//! tokio::spawn(gateway.run());
//!
//! let processor = MessageProcessor::new(brain, client, db, ProcessorConfig::default());
//! processor
//!     .run_with_shutdown(events, async {
//!         let _ = tokio::signal::ctrl_c().await;
//!     })
//!     .await?;
//! # Ok(())
//! # }
//! ```

mod processor;
mod text;

pub use processor::{MessageProcessor, ProcessResult, ProcessorConfig, ProcessorError};
pub use text::{clean_content, with_attachment_markers};

/// Crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
