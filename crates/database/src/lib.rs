//! JSON document persistence layer for nikorihito.
//!
//! Each kind of state lives in its own pretty-printed JSON file under a data
//! directory. A [`Database`] loads every document once at startup and keeps
//! a single in-memory copy of each behind its own mutex; every mutation is
//! written back to disk before the lock is released.
//!
//! # Example
//!
//! ```no_run
//! use database::{mute, settings, Database};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::open("data")?;
//!
//!     settings::upsert_settings(&db, "1234", |s| s.language = "English".into()).await?;
//!     mute::set_muted(&db, false).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod draw_log;
pub mod error;
pub mod fatigue;
pub mod history;
pub mod models;
pub mod mute;
pub mod reminder;
pub mod settings;
pub mod store;

pub use error::{DatabaseError, Result};
pub use models::{
    ConversationRecord, DrawLogDoc, FatigueDoc, MemoryDoc, MuteState, Reminder, RemindersDoc,
    Role, SettingsDoc, Turn, UserSettings, DEFAULT_LANGUAGE,
};
pub use reminder::DueReminder;
pub use store::{Document, DocumentStore, SCHEMA_VERSION};

use std::path::Path;

pub const MEMORY_FILE: &str = "nikorihito_memory.json";
pub const MUTE_FILE: &str = "nikorihito_mute.json";
pub const DRAW_LOG_FILE: &str = "omikuji_log.json";
pub const REMINDER_FILE: &str = "nikorihito_reminders.json";
pub const FATIGUE_FILE: &str = "nikorihito_sleep.json";
pub const SETTINGS_FILE: &str = "nikorihito_settings.json";

/// All persisted documents.
#[derive(Debug)]
pub struct Database {
    store: DocumentStore,
    pub settings: Document<SettingsDoc>,
    pub memory: Document<MemoryDoc>,
    pub draws: Document<DrawLogDoc>,
    pub reminders: Document<RemindersDoc>,
    pub fatigue: Document<FatigueDoc>,
    pub mute: Document<MuteState>,
}

impl Database {
    /// Open the store in `dir`, creating the directory if needed, and load
    /// every document. Missing files start empty.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        let store = DocumentStore::new(dir);

        let db = Self {
            settings: Document::open(&store, SETTINGS_FILE)?,
            memory: Document::open(&store, MEMORY_FILE)?,
            draws: Document::open(&store, DRAW_LOG_FILE)?,
            reminders: Document::open(&store, REMINDER_FILE)?,
            fatigue: Document::open(&store, FATIGUE_FILE)?,
            mute: Document::open(&store, MUTE_FILE)?,
            store,
        };

        tracing::info!("Opened data store: {}", dir.display());
        Ok(db)
    }

    /// The underlying document store.
    pub fn store(&self) -> &DocumentStore {
        &self.store
    }
}
