//! Mute flag operations.

use crate::error::Result;
use crate::Database;

/// Whether the bot is muted.
pub async fn is_muted(db: &Database) -> bool {
    db.mute.read(|state| state.muted).await
}

/// Set the mute flag and persist.
pub async fn set_muted(db: &Database, muted: bool) -> Result<()> {
    db.mute.update(|state| state.muted = muted).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mute_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(dir.path()).unwrap();
        assert!(!is_muted(&db).await);

        set_muted(&db, true).await.unwrap();
        let reopened = Database::open(dir.path()).unwrap();
        assert!(is_muted(&reopened).await);
    }

    #[tokio::test]
    async fn test_legacy_mute_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(crate::MUTE_FILE), r#"{"muted": true}"#).unwrap();

        let db = Database::open(dir.path()).unwrap();
        assert!(is_muted(&db).await);
    }
}
