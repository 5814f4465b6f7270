//! Daily draw log operations.

use crate::error::Result;
use crate::Database;

/// Date of the user's last draw, if any.
pub async fn last_draw(db: &Database, user_id: &str) -> Option<String> {
    db.draws.read(|doc| doc.get(user_id).cloned()).await
}

/// Record a draw for `date` unless one is already recorded for that date.
///
/// Returns `true` if the draw was recorded. Check and write happen under one
/// lock, so concurrent calls for the same user and date record at most once.
pub async fn try_record_draw(db: &Database, user_id: &str, date: &str) -> Result<bool> {
    db.draws
        .update_if(|doc| {
            if doc.get(user_id).map(String::as_str) == Some(date) {
                (false, false)
            } else {
                doc.insert(user_id.to_string(), date.to_string());
                (true, true)
            }
        })
        .await
}
