//! Reminder operations.

use tracing::info;

use crate::error::Result;
use crate::models::Reminder;
use crate::Database;

/// A reminder selected for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DueReminder {
    pub user_id: String,
    pub reminder: Reminder,
}

/// Append a reminder for a user and persist.
///
/// `time` must already be normalized to `HH:MM`; anything else never matches
/// a tick.
pub async fn register(
    db: &Database,
    user_id: &str,
    time: &str,
    content: &str,
    repeat: bool,
) -> Result<()> {
    let reminder = Reminder {
        time: time.to_string(),
        content: content.to_string(),
        repeat,
    };
    db.reminders
        .update(|doc| doc.entry(user_id.to_string()).or_default().push(reminder))
        .await?;
    info!(user_id = %user_id, time = %time, repeat, "Registered reminder");
    Ok(())
}

/// Reminders registered by a user, in registration order.
pub async fn list_reminders(db: &Database, user_id: &str) -> Vec<Reminder> {
    db.reminders
        .read(|doc| doc.get(user_id).cloned().unwrap_or_default())
        .await
}

/// Select every reminder due at `hhmm` and remove the one-shot ones.
///
/// The document is persisted once, and only if something was removed.
pub async fn take_due(db: &Database, hhmm: &str) -> Result<Vec<DueReminder>> {
    db.reminders
        .update_if(|doc| {
            let mut due = Vec::new();
            let mut removed = false;

            for (user_id, reminders) in doc.iter_mut() {
                reminders.retain(|reminder| {
                    if reminder.time != hhmm {
                        return true;
                    }
                    due.push(DueReminder {
                        user_id: user_id.clone(),
                        reminder: reminder.clone(),
                    });
                    if !reminder.repeat {
                        removed = true;
                    }
                    reminder.repeat
                });
            }

            if removed {
                doc.retain(|_, reminders| !reminders.is_empty());
            }
            (due, removed)
        })
        .await
}
