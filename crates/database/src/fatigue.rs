//! Fatigue (sleep) log operations.

use crate::error::Result;
use crate::Database;

/// Increment the user's fallback count for `date` and return the new count.
pub async fn record_fatigue(db: &Database, user_id: &str, date: &str) -> Result<u32> {
    db.fatigue
        .update(|doc| {
            let count = doc
                .entry(user_id.to_string())
                .or_default()
                .entry(date.to_string())
                .or_insert(0);
            *count += 1;
            *count
        })
        .await
}

/// The user's fallback count for `date`.
pub async fn fatigue_count(db: &Database, user_id: &str, date: &str) -> u32 {
    db.fatigue
        .read(|doc| {
            doc.get(user_id)
                .and_then(|days| days.get(date))
                .copied()
                .unwrap_or(0)
        })
        .await
}

/// Clear every user's counts, keeping the user keys, and persist.
pub async fn clear_fatigue(db: &Database) -> Result<()> {
    db.fatigue
        .update(|doc| doc.values_mut().for_each(|days| days.clear()))
        .await
}
