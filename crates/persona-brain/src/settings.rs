//! Settings resolver.

use std::sync::Arc;

use database::{settings, Database, Result, UserSettings};

use crate::locale::{Locale, LocaleProfile};

/// Settings with the language token mapped to a locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSettings {
    pub locale: Locale,
    /// Language token as stored.
    pub language: String,
    pub morning_message: bool,
}

impl ResolvedSettings {
    pub fn profile(&self) -> &'static LocaleProfile {
        self.locale.profile()
    }
}

impl From<UserSettings> for ResolvedSettings {
    fn from(stored: UserSettings) -> Self {
        Self {
            locale: Locale::from_language(&stored.language),
            language: stored.language,
            morning_message: stored.morning_message,
        }
    }
}

/// Fields to change. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsUpdate {
    pub language: Option<String>,
    pub morning_message: Option<bool>,
}

/// Reads and writes per-user settings.
#[derive(Clone)]
pub struct SettingsResolver {
    db: Arc<Database>,
}

impl SettingsResolver {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Stored settings, or defaults if the user has none. Never persists.
    pub async fn resolve(&self, user_id: &str) -> ResolvedSettings {
        settings::get_settings(&self.db, user_id)
            .await
            .unwrap_or_default()
            .into()
    }

    /// Apply `update` on top of the stored settings (or defaults) and persist.
    pub async fn update(&self, user_id: &str, update: SettingsUpdate) -> Result<ResolvedSettings> {
        let stored = settings::upsert_settings(&self.db, user_id, |s| {
            if let Some(language) = update.language.filter(|l| !l.trim().is_empty()) {
                s.language = language.trim().to_string();
            }
            if let Some(morning) = update.morning_message {
                s.morning_message = morning;
            }
        })
        .await?;
        Ok(stored.into())
    }

    /// Persist defaults for a user seen for the first time.
    pub async fn ensure(&self, user_id: &str) -> Result<bool> {
        settings::ensure_settings(&self.db, user_id).await
    }

    /// Users opted in to the morning greeting, with their locale.
    pub async fn morning_recipients(&self) -> Vec<(String, Locale)> {
        settings::list_settings(&self.db)
            .await
            .into_iter()
            .filter(|(_, s)| s.morning_message)
            .map(|(id, s)| (id, Locale::from_language(&s.language)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> (tempfile::TempDir, SettingsResolver) {
        let dir = tempfile::tempdir().unwrap();
        let db = Arc::new(Database::open(dir.path()).unwrap());
        (dir, SettingsResolver::new(db))
    }

    #[tokio::test]
    async fn test_resolve_defaults_without_persisting() {
        let (dir, resolver) = resolver();

        let resolved = resolver.resolve("u1").await;
        assert_eq!(resolved.locale, Locale::Japanese);
        assert!(resolved.morning_message);
        assert!(!dir.path().join(database::SETTINGS_FILE).exists());
    }

    #[tokio::test]
    async fn test_update_partial_fields() {
        let (_dir, resolver) = resolver();

        let resolved = resolver
            .update(
                "u1",
                SettingsUpdate {
                    language: Some("english".into()),
                    morning_message: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(resolved.locale, Locale::English);
        assert!(resolved.morning_message);

        let resolved = resolver
            .update(
                "u1",
                SettingsUpdate {
                    language: None,
                    morning_message: Some(false),
                },
            )
            .await
            .unwrap();
        assert_eq!(resolved.language, "english");
        assert!(!resolved.morning_message);
    }

    #[tokio::test]
    async fn test_morning_recipients() {
        let (_dir, resolver) = resolver();
        resolver.ensure("u1").await.unwrap();
        resolver
            .update(
                "u2",
                SettingsUpdate {
                    morning_message: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        resolver
            .update(
                "u3",
                SettingsUpdate {
                    language: Some("English".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(
            resolver.morning_recipients().await,
            vec![
                ("u1".to_string(), Locale::Japanese),
                ("u3".to_string(), Locale::English)
            ]
        );
    }
}
