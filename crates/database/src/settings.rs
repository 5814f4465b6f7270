//! User settings operations.

use crate::error::Result;
use crate::models::UserSettings;
use crate::Database;

/// Get stored settings for a user, if any.
pub async fn get_settings(db: &Database, user_id: &str) -> Option<UserSettings> {
    db.settings.read(|doc| doc.get(user_id).cloned()).await
}

/// Insert defaults for `user_id` if missing, apply `f`, and persist.
///
/// Returns the stored settings after the change.
pub async fn upsert_settings(
    db: &Database,
    user_id: &str,
    f: impl FnOnce(&mut UserSettings),
) -> Result<UserSettings> {
    db.settings
        .update(|doc| {
            let entry = doc.entry(user_id.to_string()).or_default();
            f(entry);
            entry.clone()
        })
        .await
}

/// Persist default settings for `user_id` if none exist.
///
/// Returns `true` when an entry was created.
pub async fn ensure_settings(db: &Database, user_id: &str) -> Result<bool> {
    db.settings
        .update_if(|doc| {
            if doc.contains_key(user_id) {
                (false, false)
            } else {
                doc.insert(user_id.to_string(), UserSettings::default());
                (true, true)
            }
        })
        .await
}

/// All users with stored settings, in insertion order.
pub async fn list_settings(db: &Database) -> Vec<(String, UserSettings)> {
    db.settings
        .read(|doc| doc.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
        .await
}
