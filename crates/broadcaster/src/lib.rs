//! Outbound delivery utilities for nikorihito.
//!
//! This crate provides the [`MessageSender`] seam the rest of the bot sends
//! through, and a [`Broadcaster`] for batches of direct messages where one
//! failed recipient must not stop the others.
//!
//! # Example
//!
//! ```no_run
//! use broadcaster::{Broadcaster, Delivery};
//! use discord_gateway::DiscordClient;
//!
//! # async fn example() {
//! let client = DiscordClient::new("token");
//! let broadcaster = Broadcaster::new(client);
//!
//! let report = broadcaster
//!     .broadcast_direct(vec![Delivery::new("1234", "Good morning!")])
//!     .await;
//! println!("{} delivered, {} failed", report.delivered(), report.failed());
//! # }
//! ```

mod sender;

pub use sender::{LoggingSender, MessageSender, NoOpSender, RecordingSender, SentMessage};

use discord_gateway::GatewayError;
use thiserror::Error;
use tracing::{info, warn};

/// Errors that can occur during delivery.
#[derive(Debug, Error)]
pub enum Error {
    /// Discord communication error.
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    /// Delivery was refused.
    #[error("Send failed: {0}")]
    Send(String),
}

/// One direct message to deliver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub recipient: String,
    pub text: String,
}

impl Delivery {
    pub fn new(recipient: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            recipient: recipient.into(),
            text: text.into(),
        }
    }
}

/// Result of delivering to one recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryStatus {
    Delivered,
    Failed { reason: String },
}

/// Per-recipient outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryOutcome {
    pub recipient: String,
    pub status: DeliveryStatus,
}

impl DeliveryOutcome {
    pub fn is_delivered(&self) -> bool {
        self.status == DeliveryStatus::Delivered
    }
}

/// Outcomes of a batch, in delivery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    pub outcomes: Vec<DeliveryOutcome>,
}

impl BroadcastReport {
    pub fn delivered(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_delivered()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.delivered()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

/// Delivers direct messages through a [`MessageSender`].
#[derive(Clone)]
pub struct Broadcaster<S> {
    sender: S,
}

impl<S: MessageSender> Broadcaster<S> {
    pub fn new(sender: S) -> Self {
        Self { sender }
    }

    /// Get the underlying sender.
    pub fn sender(&self) -> &S {
        &self.sender
    }

    /// Deliver one direct message. Failures are logged and returned as an
    /// outcome, never as an error.
    pub async fn send_direct(&self, delivery: &Delivery) -> DeliveryOutcome {
        let status = match self
            .sender
            .send_direct_message(&delivery.recipient, &delivery.text)
            .await
        {
            Ok(()) => DeliveryStatus::Delivered,
            Err(e) => {
                warn!(recipient = %delivery.recipient, "Direct message failed: {}", e);
                DeliveryStatus::Failed {
                    reason: e.to_string(),
                }
            }
        };
        DeliveryOutcome {
            recipient: delivery.recipient.clone(),
            status,
        }
    }

    /// Deliver every message in order; failures do not stop the batch.
    pub async fn broadcast_direct(&self, deliveries: Vec<Delivery>) -> BroadcastReport {
        let mut report = BroadcastReport::default();
        for delivery in &deliveries {
            report.outcomes.push(self.send_direct(delivery).await);
        }

        if !report.is_empty() {
            info!(
                "Broadcast finished: {} delivered, {} failed",
                report.delivered(),
                report.failed()
            );
        }
        report
    }
}

/// Crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
