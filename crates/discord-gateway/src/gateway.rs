//! Discord gateway connection and inbound event stream.

use std::collections::HashMap;
use std::pin::Pin;
use std::sync::{Arc, OnceLock};
use std::task::{Context as TaskContext, Poll};
use std::time::Duration;

use futures::stream::Stream;
use serenity::all::{
    Command, CommandDataOptionValue, CommandInteraction, Context, CreateInteractionResponse,
    CreateInteractionResponseMessage, EventHandler, GatewayIntents, GuildId, Interaction, Message,
    Ready, UserId,
};
use serenity::async_trait;
use serenity::gateway::ShardManager;
use serenity::Client;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::client::DiscordClient;
use crate::commands::command_builders;
use crate::config::GatewayConfig;
use crate::error::Result;
use crate::types::{ChatMessage, CommandInvocation, CommandValue, GatewayEvent};

/// A stream of inbound gateway events.
pub struct EventStream {
    rx: mpsc::Receiver<GatewayEvent>,
}

impl Stream for EventStream {
    type Item = GatewayEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut TaskContext<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}

/// Create a connected sender/stream pair.
///
/// The gateway uses this internally; tests use it to feed events directly.
pub fn event_channel(buffer: usize) -> (mpsc::Sender<GatewayEvent>, EventStream) {
    let (tx, rx) = mpsc::channel(buffer);
    (tx, EventStream { rx })
}

struct Handler {
    events: mpsc::Sender<GatewayEvent>,
    bot_id: OnceLock<UserId>,
    command_guild_id: Option<u64>,
    reply_timeout: Duration,
}

impl Handler {
    async fn forward(&self, event: GatewayEvent) {
        if self.events.send(event).await.is_err() {
            debug!("Event receiver dropped, discarding event");
        }
    }

    async fn register_commands(&self, ctx: &Context) {
        let builders = command_builders();
        let count = builders.len();

        let result = match self.command_guild_id {
            Some(guild) => GuildId::new(guild)
                .set_commands(&ctx.http, builders)
                .await
                .map(|_| ()),
            None => Command::set_global_commands(&ctx.http, builders)
                .await
                .map(|_| ()),
        };

        match result {
            Ok(()) => info!("Registered {} slash commands", count),
            Err(e) => error!("Failed to register slash commands: {}", e),
        }
    }

    async fn handle_command(&self, ctx: &Context, command: CommandInteraction) {
        let options = command
            .data
            .options
            .iter()
            .filter_map(|option| {
                let value = match &option.value {
                    CommandDataOptionValue::String(s) => CommandValue::String(s.clone()),
                    CommandDataOptionValue::Boolean(b) => CommandValue::Bool(*b),
                    other => {
                        debug!("Ignoring unsupported option {}: {:?}", option.name, other);
                        return None;
                    }
                };
                Some((option.name.clone(), value))
            })
            .collect::<HashMap<_, _>>();

        let (invocation, reply) =
            CommandInvocation::new(command.data.name.clone(), command.user.id.to_string(), options);
        self.forward(GatewayEvent::Command(invocation)).await;

        let text = match tokio::time::timeout(self.reply_timeout, reply).await {
            Ok(Ok(text)) => text,
            Ok(Err(_)) => {
                warn!("Command {} dropped without a reply", command.data.name);
                return;
            }
            Err(_) => {
                warn!("Command {} timed out waiting for a reply", command.data.name);
                return;
            }
        };

        let response =
            CreateInteractionResponse::Message(CreateInteractionResponseMessage::new().content(text));
        if let Err(e) = command.create_response(&ctx.http, response).await {
            error!("Failed to respond to {}: {}", command.data.name, e);
        }
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        let _ = self.bot_id.set(ready.user.id);
        info!("Connected to Discord as {} (id: {})", ready.user.name, ready.user.id);

        self.register_commands(&ctx).await;
        self.forward(GatewayEvent::Ready {
            bot_id: ready.user.id.to_string(),
        })
        .await;
    }

    async fn message(&self, _ctx: Context, msg: Message) {
        let mentions_bot = self
            .bot_id
            .get()
            .is_some_and(|bot_id| msg.mentions_user_id(*bot_id));
        let is_self = self.bot_id.get() == Some(&msg.author.id);

        let chat = ChatMessage {
            author_id: msg.author.id.to_string(),
            display_name: author_name(
                msg.member.as_ref().and_then(|m| m.nick.as_deref()),
                msg.author.display_name(),
            ),
            channel_id: msg.channel_id.to_string(),
            content: msg.content.clone(),
            attachments: msg.attachments.iter().map(|a| a.url.clone()).collect(),
            mentions_bot,
            author_is_bot: msg.author.bot || is_self,
        };
        self.forward(GatewayEvent::Message(chat)).await;
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        if let Interaction::Command(command) = interaction {
            self.handle_command(&ctx, command).await;
        }
    }
}

/// A Discord gateway connection.
pub struct DiscordGateway {
    client: Client,
}

impl DiscordGateway {
    /// Build the gateway client.
    ///
    /// Returns the gateway (call [`DiscordGateway::run`] to connect), an
    /// outbound client sharing its HTTP session, and the inbound event stream.
    pub async fn connect(config: GatewayConfig) -> Result<(Self, DiscordClient, EventStream)> {
        let (tx, stream) = event_channel(config.event_buffer);
        let handler = Handler {
            events: tx,
            bot_id: OnceLock::new(),
            command_guild_id: config.command_guild_id,
            reply_timeout: config.command_reply_timeout,
        };

        let intents = GatewayIntents::GUILDS
            | GatewayIntents::GUILD_MESSAGES
            | GatewayIntents::DIRECT_MESSAGES
            | GatewayIntents::MESSAGE_CONTENT;

        let client = Client::builder(&config.token, intents)
            .event_handler(handler)
            .await?;
        let outbound = DiscordClient::from_http(client.http.clone());

        info!("Discord gateway client built");
        Ok((Self { client }, outbound, stream))
    }

    /// Handle for shutting the connection down from another task.
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            shard_manager: self.client.shard_manager.clone(),
        }
    }

    /// Connect and process events until the connection ends.
    pub async fn run(mut self) -> Result<()> {
        info!("Starting Discord gateway connection");
        self.client.start().await?;
        Ok(())
    }
}

/// Name to address the author by: guild nickname first, then the account's
/// display name.
fn author_name(nick: Option<&str>, display_name: &str) -> String {
    nick.map(str::trim)
        .filter(|nick| !nick.is_empty())
        .unwrap_or(display_name)
        .to_string()
}

/// Stops a running gateway.
#[derive(Clone)]
pub struct ShutdownHandle {
    shard_manager: Arc<ShardManager>,
}

impl ShutdownHandle {
    pub async fn shutdown(&self) {
        info!("Shutting down Discord gateway");
        self.shard_manager.shutdown_all().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[test]
    fn test_author_name_prefers_guild_nickname() {
        assert_eq!(author_name(Some("Nikochan"), "Alice"), "Nikochan");
        assert_eq!(author_name(None, "Alice"), "Alice");
        assert_eq!(author_name(Some("  "), "Alice"), "Alice");
    }

    #[tokio::test]
    async fn test_event_stream_yields_in_order() {
        let (tx, mut stream) = event_channel(4);
        tx.send(GatewayEvent::Ready {
            bot_id: "1".to_string(),
        })
        .await
        .unwrap();
        let (invocation, _rx) = CommandInvocation::new("mute", "2", HashMap::new());
        tx.send(GatewayEvent::Command(invocation)).await.unwrap();
        drop(tx);

        assert!(matches!(stream.next().await, Some(GatewayEvent::Ready { .. })));
        match stream.next().await {
            Some(GatewayEvent::Command(c)) => assert_eq!(c.name, "mute"),
            other => panic!("unexpected event: {:?}", other),
        }
        assert!(stream.next().await.is_none());
    }
}
