//! Message processor that connects the Discord gateway to a Brain.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use brain_core::{Brain, BrainError, InboundAttachment, InboundMessage, SpeechSynthesizer};
use broadcaster::MessageSender;
use database::{mute, Database};
use discord_gateway::{ChatMessage, CommandInvocation, CommandValue, GatewayEvent};
use futures::{Stream, StreamExt};
use persona_brain::{Command, CommandArg, CommandHandler, Invoker};
use thiserror::Error;
use tokio::task::JoinSet;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

use crate::text::{clean_content, with_attachment_markers};

/// Default timeout for brain processing (45 seconds).
///
/// The persona bounds its own backend call; this only catches a brain that
/// hangs outside of it.
const DEFAULT_BRAIN_TIMEOUT: Duration = Duration::from_secs(45);

/// Configuration for the message processor.
#[derive(Debug, Clone)]
pub struct ProcessorConfig {
    /// The bot's own user id, if known before the gateway reports it.
    pub bot_id: Option<String>,

    /// Timeout for brain processing.
    pub brain_timeout: Duration,

    /// Whether to attach synthesized speech when a synthesizer is set.
    pub speak_replies: bool,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            bot_id: None,
            brain_timeout: DEFAULT_BRAIN_TIMEOUT,
            speak_replies: true,
        }
    }
}

impl ProcessorConfig {
    /// Create a new config with the bot's user id.
    pub fn with_bot_id(bot_id: impl Into<String>) -> Self {
        Self {
            bot_id: Some(bot_id.into()),
            ..Default::default()
        }
    }
}

/// Errors that can occur during message processing.
#[derive(Debug, Error)]
pub enum ProcessorError {
    /// Error from the brain during processing.
    #[error("brain error: {0}")]
    Brain(#[from] BrainError),

    /// The reply could not be delivered.
    #[error("send error: {0}")]
    Send(#[from] broadcaster::Error),

    /// Brain processing timed out.
    #[error("brain processing timed out after {0:?}")]
    Timeout(Duration),

    /// The command reply could not be handed back to the gateway.
    #[error("command reply for {0} was not delivered")]
    ReplyDropped(String),

    /// The event stream ended unexpectedly.
    #[error("event stream ended")]
    StreamEnded,
}

/// Result of processing a single event.
#[derive(Debug)]
pub enum ProcessResult {
    /// A reply was sent.
    Responded {
        recipient: String,
        response: String,
        /// Synthesized audio sent with the reply.
        audio: bool,
    },
    /// Event was ignored (e.g. from a bot, muted, not mentioned).
    Skipped { reason: String },
    /// Error occurred during processing.
    Error(ProcessorError),
}

/// Handles gateway events: persona replies to mentions and slash commands.
pub struct MessageProcessor<B: Brain, S: MessageSender> {
    brain: B,
    sender: S,
    db: Arc<Database>,
    commands: CommandHandler,
    speech: Option<Arc<dyn SpeechSynthesizer>>,
    bot_id: OnceLock<String>,
    config: ProcessorConfig,
}

impl<B: Brain, S: MessageSender> MessageProcessor<B, S> {
    /// Create a new message processor.
    pub fn new(brain: B, sender: S, db: Arc<Database>, config: ProcessorConfig) -> Self {
        let bot_id = OnceLock::new();
        if let Some(id) = &config.bot_id {
            let _ = bot_id.set(id.clone());
        }
        Self {
            brain,
            sender,
            commands: CommandHandler::new(db.clone()),
            db,
            speech: None,
            bot_id,
            config,
        }
    }

    /// Create a processor with default configuration.
    pub fn with_defaults(brain: B, sender: S, db: Arc<Database>) -> Self {
        Self::new(brain, sender, db, ProcessorConfig::default())
    }

    /// Attach synthesized speech to replies.
    pub fn with_speech(mut self, speech: Arc<dyn SpeechSynthesizer>) -> Self {
        self.speech = Some(speech);
        self
    }

    /// Get a reference to the brain.
    pub fn brain(&self) -> &B {
        &self.brain
    }

    /// Get a reference to the sender.
    pub fn sender(&self) -> &S {
        &self.sender
    }

    /// The bot's own user id, once known.
    pub fn bot_id(&self) -> Option<&str> {
        self.bot_id.get().map(String::as_str)
    }

    /// Check if we should reply to this message.
    async fn should_process(&self, message: &ChatMessage) -> Result<(), String> {
        if self.bot_id() == Some(message.author_id.as_str()) {
            return Err("message from self".to_string());
        }
        if message.author_is_bot {
            return Err("message from a bot".to_string());
        }
        if message.content.trim().is_empty() && message.attachments.is_empty() {
            return Err("blank message".to_string());
        }
        if mute::is_muted(&self.db).await {
            return Err("muted".to_string());
        }
        if !message.mentions_bot {
            return Err("bot not mentioned".to_string());
        }
        Ok(())
    }

    /// Process one chat message and return the result.
    pub async fn process_message(&self, message: &ChatMessage) -> ProcessResult {
        if let Err(reason) = self.should_process(message).await {
            debug!("Skipping message: {}", reason);
            return ProcessResult::Skipped { reason };
        }

        let text = clean_content(&message.content, self.bot_id());
        if text.is_empty() && message.attachments.is_empty() {
            return ProcessResult::Skipped {
                reason: "nothing left after removing mentions".to_string(),
            };
        }
        let text = with_attachment_markers(&text, &message.attachments);

        info!(
            user_id = %message.author_id,
            channel_id = %message.channel_id,
            "Processing mention: {}",
            text
        );

        let inbound = InboundMessage::in_channel(
            message.author_id.as_str(),
            text,
            unix_millis(),
            message.channel_id.as_str(),
        )
        .with_display_name(message.display_name.as_str());
        let inbound = message
            .attachments
            .iter()
            .fold(inbound, |inbound, url| {
                inbound.with_attachment(InboundAttachment::from_url(url.as_str()))
            });

        let response = match timeout(self.config.brain_timeout, self.brain.process(inbound)).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                error!(user_id = %message.author_id, "Brain error: {}", e);
                return ProcessResult::Error(ProcessorError::Brain(e));
            }
            Err(_elapsed) => {
                error!(
                    user_id = %message.author_id,
                    "Brain processing timed out after {:?}", self.config.brain_timeout
                );
                return ProcessResult::Error(ProcessorError::Timeout(self.config.brain_timeout));
            }
        };

        let audio = match &response.language_code {
            Some(code) => self.synthesize(&response.text, code).await,
            None => None,
        };

        let result = self
            .sender
            .send_to_channel(&response.recipient, &response.text, audio.as_deref())
            .await;

        if let Some(path) = &audio {
            if let Err(e) = tokio::fs::remove_file(path).await {
                debug!("Could not remove {}: {}", path.display(), e);
            }
        }

        match result {
            Ok(()) => {
                info!("Sent response to {}: {}", response.recipient, response.text);
                ProcessResult::Responded {
                    recipient: response.recipient,
                    response: response.text,
                    audio: audio.is_some(),
                }
            }
            Err(e) => {
                error!("Failed to send response to {}: {}", response.recipient, e);
                ProcessResult::Error(ProcessorError::Send(e))
            }
        }
    }

    /// Speech for `text`, or `None` if disabled or synthesis fails.
    async fn synthesize(&self, text: &str, language_code: &str) -> Option<PathBuf> {
        let speech = self.speech.as_ref().filter(|_| self.config.speak_replies)?;
        match speech.synthesize(text, language_code).await {
            Ok(path) => Some(path),
            Err(e) => {
                warn!("Speech synthesis failed, sending text only: {}", e);
                None
            }
        }
    }

    /// Run a slash command and hand its reply back to the gateway.
    pub async fn process_command(&self, mut invocation: CommandInvocation) -> ProcessResult {
        let options: HashMap<String, CommandArg> = invocation
            .options
            .iter()
            .map(|(name, value)| (name.clone(), command_arg(value)))
            .collect();

        let Some(command) = Command::parse(&invocation.name, &options) else {
            warn!(command = %invocation.name, "Unknown command or missing options");
            return ProcessResult::Skipped {
                reason: format!("unknown command {}", invocation.name),
            };
        };

        let invoker = Invoker {
            user_id: invocation.user_id.clone(),
            mention: invocation.user_mention.clone(),
        };
        let reply = self.commands.handle(&invoker, command).await;

        if invocation.respond(reply.clone()) {
            ProcessResult::Responded {
                recipient: invocation.user_id,
                response: reply,
                audio: false,
            }
        } else {
            ProcessResult::Error(ProcessorError::ReplyDropped(invocation.name))
        }
    }

    /// Dispatch one gateway event.
    pub async fn process_event(&self, event: GatewayEvent) -> ProcessResult {
        match event {
            GatewayEvent::Ready { bot_id } => {
                if self.bot_id.set(bot_id.clone()).is_err() && self.bot_id() != Some(bot_id.as_str()) {
                    warn!("Gateway reported a different bot id: {}", bot_id);
                }
                ProcessResult::Skipped {
                    reason: "gateway ready".to_string(),
                }
            }
            GatewayEvent::Message(message) => self.process_message(&message).await,
            GatewayEvent::Command(invocation) => self.process_command(invocation).await,
        }
    }

    fn log_result(result: ProcessResult) {
        match result {
            ProcessResult::Responded {
                recipient, response, ..
            } => {
                debug!("Responded to {}: {}", recipient, response);
            }
            ProcessResult::Skipped { reason } => {
                debug!("Skipped: {}", reason);
            }
            ProcessResult::Error(e) => {
                warn!("Error processing event: {}", e);
            }
        }
    }
}

impl<B, S> MessageProcessor<B, S>
where
    B: Brain + 'static,
    S: MessageSender + 'static,
{
    /// Run the processor with graceful shutdown support.
    ///
    /// Each event is handled on its own task so a slow reply does not hold
    /// up slash-command responses. Runs until either:
    /// - The provided shutdown signal completes
    /// - The event stream ends
    ///
    /// In-flight events are awaited before returning.
    pub async fn run_with_shutdown<E, F>(self, events: E, shutdown_signal: F) -> Result<(), ProcessorError>
    where
        E: Stream<Item = GatewayEvent> + Send + Unpin,
        F: std::future::Future<Output = ()> + Send,
    {
        info!(
            "Starting message processor with brain: {} (graceful shutdown enabled)",
            self.brain.name()
        );

        let processor = Arc::new(self);
        let mut events = events;
        let mut tasks = JoinSet::new();

        tokio::pin!(shutdown_signal);

        let outcome = loop {
            tokio::select! {
                biased;

                () = &mut shutdown_signal => {
                    info!("Shutdown signal received, stopping message processor");
                    break Ok(());
                }

                Some(joined) = tasks.join_next(), if !tasks.is_empty() => {
                    if let Err(e) = joined {
                        error!("Event task failed: {}", e);
                    }
                }

                event = events.next() => {
                    match event {
                        Some(event) => {
                            let processor = processor.clone();
                            tasks.spawn(async move {
                                Self::log_result(processor.process_event(event).await);
                            });
                        }
                        None => {
                            warn!("Event stream ended");
                            break Err(ProcessorError::StreamEnded);
                        }
                    }
                }
            }
        };

        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                error!("Event task failed: {}", e);
            }
        }
        if let Err(e) = processor.brain.shutdown().await {
            warn!("Error during brain shutdown: {}", e);
        }
        outcome
    }
}

fn command_arg(value: &CommandValue) -> CommandArg {
    match value {
        CommandValue::String(text) => CommandArg::Text(text.clone()),
        CommandValue::Bool(flag) => CommandArg::Flag(*flag),
    }
}

fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use broadcaster::RecordingSender;
    use discord_gateway::command_specs;
    use mock_brain::EchoGenerator;
    use persona_brain::{FatigueLadder, PersonaBrain, PersonaConfig};

    type TestProcessor = MessageProcessor<PersonaBrain<EchoGenerator>, Arc<RecordingSender>>;

    fn processor() -> (tempfile::TempDir, Arc<RecordingSender>, TestProcessor) {
        let dir = tempfile::tempdir().unwrap();
        let db = Arc::new(Database::open(dir.path()).unwrap());
        let brain = PersonaBrain::new(
            EchoGenerator::replying("hi there"),
            db.clone(),
            Arc::new(FatigueLadder::new()),
            PersonaConfig::default(),
        );
        let sender = Arc::new(RecordingSender::new());
        let processor =
            MessageProcessor::new(brain, sender.clone(), db, ProcessorConfig::with_bot_id("42"));
        (dir, sender, processor)
    }

    fn mention(content: &str) -> ChatMessage {
        ChatMessage {
            author_id: "7".to_string(),
            display_name: "Alice".to_string(),
            channel_id: "100".to_string(),
            content: content.to_string(),
            attachments: Vec::new(),
            mentions_bot: true,
            author_is_bot: false,
        }
    }

    #[test]
    fn test_config_with_bot_id() {
        let config = ProcessorConfig::with_bot_id("42");
        assert_eq!(config.bot_id, Some("42".to_string()));
        assert_eq!(config.brain_timeout, DEFAULT_BRAIN_TIMEOUT);
    }

    #[tokio::test]
    async fn test_skips_bots_and_self() {
        let (_dir, sender, processor) = processor();

        let mut from_bot = mention("<@42> hi");
        from_bot.author_is_bot = true;
        assert!(matches!(
            processor.process_message(&from_bot).await,
            ProcessResult::Skipped { .. }
        ));

        let mut from_self = mention("<@42> hi");
        from_self.author_id = "42".to_string();
        assert!(matches!(
            processor.process_message(&from_self).await,
            ProcessResult::Skipped { .. }
        ));
        assert!(sender.sent().is_empty());
    }

    #[tokio::test]
    async fn test_skips_unmentioned_and_empty() {
        let (_dir, sender, processor) = processor();

        let mut plain = mention("hello everyone");
        plain.mentions_bot = false;
        assert!(matches!(
            processor.process_message(&plain).await,
            ProcessResult::Skipped { .. }
        ));

        assert!(matches!(
            processor.process_message(&mention("<@42> ##note##")).await,
            ProcessResult::Skipped { .. }
        ));
        assert!(sender.sent().is_empty());
    }

    #[tokio::test]
    async fn test_ready_sets_bot_id() {
        let dir = tempfile::tempdir().unwrap();
        let db = Arc::new(Database::open(dir.path()).unwrap());
        let brain = PersonaBrain::new(
            EchoGenerator::new(),
            db.clone(),
            Arc::new(FatigueLadder::new()),
            PersonaConfig::default(),
        );
        let processor = MessageProcessor::with_defaults(brain, broadcaster::NoOpSender, db);
        assert_eq!(processor.bot_id(), None);

        processor
            .process_event(GatewayEvent::Ready {
                bot_id: "99".to_string(),
            })
            .await;
        assert_eq!(processor.bot_id(), Some("99"));
    }

    #[tokio::test]
    async fn test_every_registered_command_parses() {
        for spec in command_specs() {
            let options: HashMap<String, CommandArg> = spec
                .options
                .iter()
                .filter(|o| o.required)
                .map(|o| (o.name.to_string(), CommandArg::Text("08:00".to_string())))
                .collect();
            let command = Command::parse(spec.name, &options);
            assert!(command.is_some(), "{} is not handled", spec.name);
            assert_eq!(command.unwrap().name(), spec.name);
        }
    }

    #[tokio::test]
    async fn test_command_reply_reaches_gateway() {
        let (_dir, _sender, processor) = processor();

        let (invocation, reply) =
            CommandInvocation::new(persona_brain::command_names::MUTE, "7", HashMap::new());
        let result = processor.process_command(invocation).await;
        assert!(matches!(result, ProcessResult::Responded { .. }));

        let text = reply.await.unwrap();
        assert!(!text.is_empty());
        assert!(mute::is_muted(&processor.db).await);
    }

    #[tokio::test]
    async fn test_unknown_command_skipped() {
        let (_dir, _sender, processor) = processor();
        let (invocation, _reply) = CommandInvocation::new("dance", "7", HashMap::new());
        assert!(matches!(
            processor.process_command(invocation).await,
            ProcessResult::Skipped { .. }
        ));
    }
}
