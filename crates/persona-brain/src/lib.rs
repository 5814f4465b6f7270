//! The nikorihito persona.
//!
//! [`PersonaBrain`] turns a mention into a reply: it resolves the user's
//! locale, assembles a role prompt from lore and recent history, calls a
//! [`Generator`](brain_core::Generator) and appends the sign-off. Quota
//! failures walk the shared [`FatigueLadder`] instead of surfacing errors.
//!
//! The crate also owns the small stateful conveniences around the persona:
//! per-user settings, daily fortune draws and slash-command handling.

mod commands;
mod config;
mod engine;
mod fatigue;
mod fortune;
mod locale;
mod settings;

pub use commands::{normalize_time, Command, CommandArg, CommandHandler, Invoker};
pub use config::PersonaConfig;
pub use engine::{build_prompt, PersonaBrain, PersonaReply, ReplyKind, ATTACHMENT_MARKER};
pub use fatigue::{fatigue_line, FatigueLadder, FatigueLevel};
pub use fortune::{draw, DrawOutcome, FortuneGrade};
pub use locale::{DreamVignette, Friend, Locale, LocaleProfile, ENGLISH, ENGLISH_TOKEN, JAPANESE};
pub use settings::{ResolvedSettings, SettingsResolver, SettingsUpdate};

/// Registered slash-command names.
pub mod command_names {
    pub use crate::commands::{
        BIRTHDAY, CHRISTMAS, MUTE, MUTE_OFF, NEW_YEAR, OMIKUJI, REMINDER, SETTINGS,
    };
}

// Re-export brain-core types for convenience
pub use brain_core::{async_trait, Brain, BrainError, Generator};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
