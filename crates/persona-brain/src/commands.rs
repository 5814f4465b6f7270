//! Slash-command handling.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Local, NaiveDate, NaiveTime};
use database::{mute, reminder, Database};
use tracing::{error, info};

use crate::fortune::{self, DrawOutcome};
use crate::locale::LocaleProfile;
use crate::settings::{SettingsResolver, SettingsUpdate};

pub const BIRTHDAY: &str = "nikorihito_birthday";
pub const OMIKUJI: &str = "nikorihito_omikuji";
pub const MUTE: &str = "mute";
pub const MUTE_OFF: &str = "mute_off";
pub const REMINDER: &str = "nikorihito_reminder";
pub const SETTINGS: &str = "settings";
pub const CHRISTMAS: &str = "nikorihito_chrismas";
pub const NEW_YEAR: &str = "nikorihito_newyear";

/// An option value supplied with a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandArg {
    Text(String),
    Flag(bool),
}

/// A parsed slash command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Birthday,
    Omikuji,
    Mute,
    MuteOff,
    Reminder {
        time: String,
        content: String,
        repeat: bool,
    },
    Settings(SettingsUpdate),
    Christmas,
    NewYear,
}

impl Command {
    /// Build a command from its registered name and options.
    ///
    /// Returns `None` for unknown names or missing required options.
    pub fn parse(name: &str, options: &HashMap<String, CommandArg>) -> Option<Self> {
        let text = |key: &str| match options.get(key) {
            Some(CommandArg::Text(value)) => Some(value.clone()),
            _ => None,
        };
        let flag = |key: &str| match options.get(key) {
            Some(CommandArg::Flag(value)) => Some(*value),
            _ => None,
        };

        let command = match name {
            BIRTHDAY => Command::Birthday,
            OMIKUJI => Command::Omikuji,
            MUTE => Command::Mute,
            MUTE_OFF => Command::MuteOff,
            REMINDER => Command::Reminder {
                time: text("time")?,
                content: text("content")?,
                repeat: flag("repeat").unwrap_or(false),
            },
            SETTINGS => Command::Settings(SettingsUpdate {
                language: text("language"),
                morning_message: flag("morning_message"),
            }),
            CHRISTMAS => Command::Christmas,
            NEW_YEAR => Command::NewYear,
            _ => return None,
        };
        Some(command)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::Birthday => BIRTHDAY,
            Command::Omikuji => OMIKUJI,
            Command::Mute => MUTE,
            Command::MuteOff => MUTE_OFF,
            Command::Reminder { .. } => REMINDER,
            Command::Settings(_) => SETTINGS,
            Command::Christmas => CHRISTMAS,
            Command::NewYear => NEW_YEAR,
        }
    }
}

/// Who invoked a command.
#[derive(Debug, Clone)]
pub struct Invoker {
    pub user_id: String,
    /// Platform mention markup for the user.
    pub mention: String,
}

/// Normalize a wall-clock time to `HH:MM`, or `None` if it is not one.
pub fn normalize_time(raw: &str) -> Option<String> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M")
        .ok()
        .map(|t| t.format("%H:%M").to_string())
}

/// Executes commands and renders replies in the invoker's locale.
#[derive(Clone)]
pub struct CommandHandler {
    db: Arc<Database>,
    settings: SettingsResolver,
}

impl CommandHandler {
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            settings: SettingsResolver::new(db.clone()),
            db,
        }
    }

    /// Handle a command using today's local date.
    pub async fn handle(&self, invoker: &Invoker, command: Command) -> String {
        self.handle_on(invoker, command, Local::now().date_naive()).await
    }

    /// Handle a command as if on `today`.
    pub async fn handle_on(&self, invoker: &Invoker, command: Command, today: NaiveDate) -> String {
        let profile = self.settings.resolve(&invoker.user_id).await.profile();
        let name = command.name();
        info!(user_id = %invoker.user_id, command = name, "handling command");

        match self.execute(invoker, command, profile, today).await {
            Ok(reply) => reply,
            Err(e) => {
                error!(user_id = %invoker.user_id, command = name, "command failed: {}", e);
                profile.generic_error.to_string()
            }
        }
    }

    async fn execute(
        &self,
        invoker: &Invoker,
        command: Command,
        profile: &'static LocaleProfile,
        today: NaiveDate,
    ) -> database::Result<String> {
        let reply = match command {
            Command::Birthday => profile.birthday.replace("{mention}", &invoker.mention),
            Command::Omikuji => match fortune::draw(&self.db, &invoker.user_id, today).await? {
                DrawOutcome::Drawn(grade) => profile
                    .fortune_result
                    .replace("{mention}", &invoker.mention)
                    .replace("{result}", grade.text(profile)),
                DrawOutcome::AlreadyDrawn => {
                    profile.already_drawn.replace("{mention}", &invoker.mention)
                }
            },
            Command::Mute => {
                mute::set_muted(&self.db, true).await?;
                profile.mute_on.to_string()
            }
            Command::MuteOff => {
                mute::set_muted(&self.db, false).await?;
                profile.mute_off.to_string()
            }
            Command::Reminder {
                time,
                content,
                repeat,
            } => {
                let Some(time) = normalize_time(&time) else {
                    return Ok(profile.reminder_invalid_time.to_string());
                };
                reminder::register(&self.db, &invoker.user_id, &time, &content, repeat).await?;

                let template = if repeat {
                    profile.reminder_registered_daily
                } else {
                    profile.reminder_registered
                };
                template
                    .replace("{time}", &time)
                    .replace("{content}", &content)
            }
            Command::Settings(update) => {
                let resolved = self.settings.update(&invoker.user_id, update).await?;
                let profile = resolved.profile();
                profile
                    .settings_updated
                    .replace("{language}", &resolved.language)
                    .replace("{morning}", profile.switch_label(resolved.morning_message))
            }
            Command::Christmas => profile.christmas.to_string(),
            Command::NewYear => profile.new_year.to_string(),
        };
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::{ENGLISH, JAPANESE};

    fn setup() -> (tempfile::TempDir, Arc<Database>, CommandHandler) {
        let dir = tempfile::tempdir().unwrap();
        let db = Arc::new(Database::open(dir.path()).unwrap());
        let handler = CommandHandler::new(db.clone());
        (dir, db, handler)
    }

    fn invoker() -> Invoker {
        Invoker {
            user_id: "42".to_string(),
            mention: "<@42>".to_string(),
        }
    }

    #[test]
    fn test_normalize_time() {
        assert_eq!(normalize_time("08:30").as_deref(), Some("08:30"));
        assert_eq!(normalize_time(" 23:59 ").as_deref(), Some("23:59"));
        assert!(normalize_time("24:00").is_none());
        assert!(normalize_time("8時").is_none());
        assert!(normalize_time("").is_none());
    }

    #[test]
    fn test_parse_commands() {
        let mut options = HashMap::new();
        assert_eq!(Command::parse(OMIKUJI, &options), Some(Command::Omikuji));
        assert_eq!(Command::parse("unknown", &options), None);

        // reminder requires time and content
        assert_eq!(Command::parse(REMINDER, &options), None);
        options.insert("time".to_string(), CommandArg::Text("07:00".into()));
        options.insert("content".to_string(), CommandArg::Text("wake".into()));
        assert_eq!(
            Command::parse(REMINDER, &options),
            Some(Command::Reminder {
                time: "07:00".into(),
                content: "wake".into(),
                repeat: false
            })
        );

        let mut options = HashMap::new();
        options.insert("morning_message".to_string(), CommandArg::Flag(false));
        assert_eq!(
            Command::parse(SETTINGS, &options),
            Some(Command::Settings(SettingsUpdate {
                language: None,
                morning_message: Some(false)
            }))
        );
    }

    #[tokio::test]
    async fn test_mute_commands_toggle_flag() {
        let (_dir, db, handler) = setup();

        let reply = handler.handle(&invoker(), Command::Mute).await;
        assert_eq!(reply, JAPANESE.mute_on);
        assert!(mute::is_muted(&db).await);

        handler.handle(&invoker(), Command::MuteOff).await;
        assert!(!mute::is_muted(&db).await);
    }

    #[tokio::test]
    async fn test_omikuji_once_per_day() {
        let (_dir, _db, handler) = setup();
        let today = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();

        let first = handler.handle_on(&invoker(), Command::Omikuji, today).await;
        assert!(first.starts_with("<@42>の今日の運勢は..."));

        let second = handler.handle_on(&invoker(), Command::Omikuji, today).await;
        assert_eq!(second, "<@42>、今日はもう引いてるニコリ！！");
    }

    #[tokio::test]
    async fn test_reminder_validates_and_registers() {
        let (_dir, db, handler) = setup();

        let reply = handler
            .handle(
                &invoker(),
                Command::Reminder {
                    time: "25:00".into(),
                    content: "x".into(),
                    repeat: false,
                },
            )
            .await;
        assert_eq!(reply, JAPANESE.reminder_invalid_time);
        assert!(reminder::list_reminders(&db, "42").await.is_empty());

        let reply = handler
            .handle(
                &invoker(),
                Command::Reminder {
                    time: "7:05".into(),
                    content: "水やり".into(),
                    repeat: true,
                },
            )
            .await;
        assert_eq!(reply, "⏰ 毎日 07:05 に『水やり』をリマインドするニコリ！！");
        assert_eq!(reminder::list_reminders(&db, "42").await[0].time, "07:05");
    }

    #[tokio::test]
    async fn test_settings_reply_uses_new_locale() {
        let (_dir, _db, handler) = setup();

        let reply = handler
            .handle(
                &invoker(),
                Command::Settings(SettingsUpdate {
                    language: Some("English".into()),
                    morning_message: Some(false),
                }),
            )
            .await;
        assert_eq!(
            reply,
            "Settings updated NIKORI!!\nCurrent settings: language=English, morning message=off"
        );

        let reply = handler.handle(&invoker(), Command::Christmas).await;
        assert_eq!(reply, ENGLISH.christmas);
    }

    #[tokio::test]
    async fn test_birthday_mentions_user() {
        let (_dir, _db, handler) = setup();
        let reply = handler.handle(&invoker(), Command::Birthday).await;
        assert!(reply.starts_with("<@42>の誕生日"));
    }
}
