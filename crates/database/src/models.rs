//! Document models.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Language stored for users of the primary locale.
pub const DEFAULT_LANGUAGE: &str = "日本語";

/// Per-user preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSettings {
    /// Preferred language token (e.g., "日本語", "English")
    #[serde(default = "default_language")]
    pub language: String,
    /// Whether the user receives the morning greeting
    #[serde(default = "default_true")]
    pub morning_message: bool,
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            language: default_language(),
            morning_message: true,
        }
    }
}

/// Who produced a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Persona,
}

/// A single turn in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn persona(content: impl Into<String>) -> Self {
        Self {
            role: Role::Persona,
            content: content.into(),
        }
    }
}

/// Conversation history for one user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationRecord {
    /// Display name seen on the most recent message
    #[serde(default)]
    pub display_name: String,
    /// Oldest first
    #[serde(default)]
    pub history: Vec<Turn>,
}

/// A daily reminder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    /// Wall-clock time, "HH:MM"
    pub time: String,
    pub content: String,
    /// Fire every day instead of once
    #[serde(default)]
    pub repeat: bool,
}

/// Process-wide mute flag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MuteState {
    #[serde(default)]
    pub muted: bool,
}

/// user id → settings
pub type SettingsDoc = IndexMap<String, UserSettings>;

/// user id → conversation
pub type MemoryDoc = IndexMap<String, ConversationRecord>;

/// user id → last draw date ("YYYY-MM-DD")
pub type DrawLogDoc = IndexMap<String, String>;

/// user id → reminders in registration order
pub type RemindersDoc = IndexMap<String, Vec<Reminder>>;

/// user id → date → fallback count
pub type FatigueDoc = IndexMap<String, IndexMap<String, u32>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_fill_missing_fields() {
        let settings: UserSettings = serde_json::from_str(r#"{"language": "English"}"#).unwrap();
        assert_eq!(settings.language, "English");
        assert!(settings.morning_message);
    }

    #[test]
    fn test_reminder_repeat_defaults_false() {
        let reminder: Reminder =
            serde_json::from_str(r#"{"time": "08:00", "content": "水やり"}"#).unwrap();
        assert!(!reminder.repeat);
    }

    #[test]
    fn test_role_serializes_snake_case() {
        let json = serde_json::to_string(&Turn::persona("hi")).unwrap();
        assert_eq!(json, r#"{"role":"persona","content":"hi"}"#);
    }
}
