//! PersonaBrain: the reply engine.

use std::sync::Arc;

use brain_core::{
    async_trait, hash_prompt, Brain, BrainError, Generator, InboundMessage, OutboundMessage,
    PromptBuilder,
};
use chrono::Local;
use database::{fatigue, history, Database, Role, Turn};
use tracing::{debug, error, info, warn};

use crate::config::PersonaConfig;
use crate::fatigue::{fatigue_line, FatigueLadder, FatigueLevel};
use crate::locale::{Locale, LocaleProfile};
use crate::settings::SettingsResolver;

/// Marker the listener appends for each attachment URL.
pub const ATTACHMENT_MARKER: &str = "[attachment:";

/// How a reply was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyKind {
    /// Backend text with the sign-off appended.
    Generated,
    /// Quota failure; fatigue line at the given level.
    Fatigued(FatigueLevel),
    /// Any other failure; generic error phrase.
    Failed,
}

/// A displayable reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonaReply {
    pub text: String,
    pub locale: Locale,
    pub kind: ReplyKind,
}

/// Brain that speaks as nikorihito.
///
/// Builds a role prompt from settings, lore and recent history, calls the
/// generator under a timeout, and falls back to stock lines on failure. It
/// never returns an error to its caller.
pub struct PersonaBrain<G> {
    generator: G,
    db: Arc<Database>,
    settings: SettingsResolver,
    fatigue: Arc<FatigueLadder>,
    config: PersonaConfig,
}

impl<G: Generator> PersonaBrain<G> {
    pub fn new(
        generator: G,
        db: Arc<Database>,
        fatigue: Arc<FatigueLadder>,
        config: PersonaConfig,
    ) -> Self {
        for locale in [Locale::Japanese, Locale::English] {
            info!(
                "Persona prompt fingerprint ({:?}): {}",
                locale,
                hash_prompt(locale.profile().instructions)
            );
        }
        info!(
            "PersonaBrain initialized with generator: {}, timeout: {:?}",
            generator.name(),
            config.backend_timeout
        );

        Self {
            generator,
            settings: SettingsResolver::new(db.clone()),
            db,
            fatigue,
            config,
        }
    }

    /// The shared fatigue ladder.
    pub fn fatigue(&self) -> &Arc<FatigueLadder> {
        &self.fatigue
    }

    /// The settings resolver used for replies.
    pub fn settings(&self) -> &SettingsResolver {
        &self.settings
    }

    /// Produce a reply to `text` from `user_id`.
    pub async fn reply(&self, user_id: &str, display_name: &str, text: &str) -> PersonaReply {
        let resolved = self.settings.resolve(user_id).await;
        let profile = resolved.profile();

        if let Err(e) = self.settings.ensure(user_id).await {
            warn!(user_id = %user_id, "failed to persist default settings: {}", e);
        }

        let turns = history::recent_turns(&self.db, user_id, self.config.prompt_history).await;
        let prompt = build_prompt(profile, display_name, &turns, text);
        debug!(user_id = %user_id, "prompt assembled ({} chars)", prompt.len());

        let outcome =
            tokio::time::timeout(self.config.backend_timeout, self.generator.generate(&prompt))
                .await
                .unwrap_or(Err(BrainError::Timeout));

        let (reply, kind) = match outcome {
            Ok(generated) => (
                format!("{}{}", generated.trim(), profile.sign_off),
                ReplyKind::Generated,
            ),
            Err(e) if e.is_quota() => {
                let failures = self.fatigue.advance();
                let level = FatigueLevel::after(failures, profile.tired_lines.len());
                warn!(user_id = %user_id, failures, ?level, "backend rate limited: {}", e);

                let today = Local::now().date_naive().format("%Y-%m-%d").to_string();
                if let Err(e) = fatigue::record_fatigue(&self.db, user_id, &today).await {
                    error!(user_id = %user_id, "failed to record fatigue: {}", e);
                }
                (fatigue_line(failures, profile), ReplyKind::Fatigued(level))
            }
            Err(e) => {
                error!(user_id = %user_id, "backend failed: {}", e);
                (profile.generic_error.to_string(), ReplyKind::Failed)
            }
        };

        // Every mention is recorded, fallbacks included.
        if let Err(e) = history::append_exchange(
            &self.db,
            user_id,
            display_name,
            text,
            &reply,
            self.config.history_retention,
        )
        .await
        {
            error!(user_id = %user_id, "failed to record history: {}", e);
        }

        PersonaReply {
            text: reply,
            locale: profile.locale,
            kind,
        }
    }
}

/// Assemble the full prompt for one message.
pub fn build_prompt(
    profile: &LocaleProfile,
    display_name: &str,
    turns: &[Turn],
    text: &str,
) -> String {
    let friends = profile
        .friends
        .iter()
        .map(|f| format!("- {}: {}", f.name, f.description))
        .collect::<Vec<_>>()
        .join("\n");

    let transcript = (!turns.is_empty()).then(|| {
        let lines = turns
            .iter()
            .map(|turn| {
                let speaker = match turn.role {
                    Role::User => display_name,
                    Role::Persona => profile.persona_name,
                };
                format!("{}: {}", speaker, turn.content)
            })
            .collect::<Vec<_>>()
            .join("\n");
        format!("{}\n{}", profile.history_heading, lines)
    });

    let attachment = text
        .contains(ATTACHMENT_MARKER)
        .then_some(profile.attachment_instruction);

    PromptBuilder::new()
        .section(profile.instructions)
        .section(format!("{}\n{}", profile.friends_heading, friends))
        .optional_section(transcript)
        .optional_section(attachment)
        .section(format!("{}\n{}", profile.speaker(display_name), text))
        .optional_section(profile.closing)
        .build()
}

#[async_trait]
impl<G: Generator> Brain for PersonaBrain<G> {
    async fn process(&self, message: InboundMessage) -> Result<OutboundMessage, BrainError> {
        let reply = self
            .reply(&message.sender, &message.display_name, &message.text)
            .await;
        debug!(sender = %message.sender, kind = ?reply.kind, "persona reply ready");

        Ok(OutboundMessage::reply_to(&message, reply.text)
            .with_language(reply.locale.profile().language_code))
    }

    fn name(&self) -> &str {
        "PersonaBrain"
    }
}
