//! Conversation history operations.

use crate::error::Result;
use crate::models::{ConversationRecord, Turn};
use crate::Database;

/// The most recent `limit` turns for a user, oldest first.
pub async fn recent_turns(db: &Database, user_id: &str, limit: usize) -> Vec<Turn> {
    db.memory
        .read(|doc| {
            doc.get(user_id)
                .map(|record| {
                    let skip = record.history.len().saturating_sub(limit);
                    record.history[skip..].to_vec()
                })
                .unwrap_or_default()
        })
        .await
}

/// Full conversation record for a user.
pub async fn get_record(db: &Database, user_id: &str) -> Option<ConversationRecord> {
    db.memory.read(|doc| doc.get(user_id).cloned()).await
}

/// Append one user turn and one persona turn, pruning the oldest exchanges so
/// at most `retention` turns remain.
///
/// An odd `retention` is rounded up so history always starts with a user turn.
pub async fn append_exchange(
    db: &Database,
    user_id: &str,
    display_name: &str,
    user_text: &str,
    persona_text: &str,
    retention: usize,
) -> Result<()> {
    db.memory
        .update(|doc| {
            let record = doc.entry(user_id.to_string()).or_default();
            record.display_name = display_name.to_string();
            record.history.push(Turn::user(user_text));
            record.history.push(Turn::persona(persona_text));

            let keep = retention + retention % 2;
            let excess = record.history.len().saturating_sub(keep);
            if excess > 0 {
                record.history.drain(..excess);
            }
        })
        .await
}
