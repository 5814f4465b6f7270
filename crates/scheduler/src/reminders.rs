//! Reminder delivery.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use broadcaster::{BroadcastReport, Broadcaster, Delivery, MessageSender};
use chrono::{Local, NaiveDateTime};
use database::{reminder, Database, DueReminder};
use persona_brain::SettingsResolver;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::error::Result;
use crate::guard::MinuteGuard;

/// What one reminder tick did.
#[derive(Debug, Clone, Default)]
pub struct TickReport {
    /// Reminders that matched the minute.
    pub fired: Vec<DueReminder>,
    /// Delivery outcome per fired reminder.
    pub deliveries: BroadcastReport,
}

/// Delivers stored reminders by direct message when their minute comes.
pub struct ReminderScheduler<S> {
    db: Arc<Database>,
    settings: SettingsResolver,
    broadcaster: Broadcaster<S>,
    guard: MinuteGuard,
}

impl<S: MessageSender> ReminderScheduler<S> {
    pub fn new(db: Arc<Database>, broadcaster: Broadcaster<S>) -> Self {
        Self {
            settings: SettingsResolver::new(db.clone()),
            db,
            broadcaster,
            guard: MinuteGuard::new(),
        }
    }

    /// Fire every reminder due at `now_hhmm`.
    ///
    /// One-shot reminders are removed and persisted before delivery, so each
    /// gets a single attempt even if the send fails.
    pub async fn tick(&self, now_hhmm: &str) -> Result<TickReport> {
        let fired = reminder::take_due(&self.db, now_hhmm).await?;
        if fired.is_empty() {
            return Ok(TickReport::default());
        }

        let mut deliveries = Vec::with_capacity(fired.len());
        for due in &fired {
            let profile = self.settings.resolve(&due.user_id).await.profile();
            let text = profile
                .reminder_due
                .replace("{content}", &due.reminder.content);
            deliveries.push(Delivery::new(due.user_id.clone(), text));
        }

        info!(time = %now_hhmm, count = fired.len(), "Delivering reminders");
        let deliveries = self.broadcaster.broadcast_direct(deliveries).await;
        Ok(TickReport { fired, deliveries })
    }

    /// Tick for the local time `now`, at most once per minute.
    pub async fn tick_at(&self, now: NaiveDateTime) -> Result<Option<TickReport>> {
        if !self.guard.try_enter(now) {
            return Ok(None);
        }
        self.tick(&now.format("%H:%M").to_string()).await.map(Some)
    }

    /// Tick every `period` until `shutdown` completes.
    pub async fn run_with_shutdown<F>(&self, period: Duration, shutdown: F)
    where
        F: Future<Output = ()> + Send,
    {
        tokio::pin!(shutdown);
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(period = ?period, "Starting reminder loop");
        loop {
            tokio::select! {
                biased;

                _ = &mut shutdown => {
                    info!("Reminder loop shutting down");
                    return;
                }

                _ = ticker.tick() => {
                    match self.tick_at(Local::now().naive_local()).await {
                        Ok(Some(report)) if !report.fired.is_empty() => {
                            debug!(
                                "Reminders: {} delivered, {} failed",
                                report.deliveries.delivered(),
                                report.deliveries.failed()
                            );
                        }
                        Ok(_) => {}
                        Err(e) => error!("Reminder tick failed: {}", e),
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use broadcaster::RecordingSender;
    use chrono::NaiveDate;

    fn scheduler() -> (
        tempfile::TempDir,
        Arc<RecordingSender>,
        ReminderScheduler<Arc<RecordingSender>>,
    ) {
        let dir = tempfile::tempdir().unwrap();
        let db = Arc::new(Database::open(dir.path()).unwrap());
        let sender = Arc::new(RecordingSender::new());
        let scheduler = ReminderScheduler::new(db, Broadcaster::new(sender.clone()));
        (dir, sender, scheduler)
    }

    #[tokio::test]
    async fn test_nothing_due() {
        let (_dir, sender, scheduler) = scheduler();
        reminder::register(&scheduler.db, "u1", "08:00", "stretch", false).await.unwrap();

        let report = scheduler.tick("07:59").await.unwrap();
        assert!(report.fired.is_empty());
        assert!(report.deliveries.is_empty());
        assert!(sender.sent().is_empty());
    }

    #[tokio::test]
    async fn test_reminder_text_is_localized() {
        let (_dir, sender, scheduler) = scheduler();
        reminder::register(&scheduler.db, "u1", "08:00", "stretch", false).await.unwrap();

        scheduler.tick("08:00").await.unwrap();
        let sent = sender.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].is_direct);
        assert!(sent[0].text.contains("『stretch』"));
    }

    #[tokio::test]
    async fn test_tick_at_guards_minute() {
        let (_dir, sender, scheduler) = scheduler();
        reminder::register(&scheduler.db, "u1", "08:00", "water", true).await.unwrap();

        let day = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let first = day.and_hms_opt(8, 0, 5).unwrap();
        let second = day.and_hms_opt(8, 0, 25).unwrap();

        assert!(scheduler.tick_at(first).await.unwrap().is_some());
        assert!(scheduler.tick_at(second).await.unwrap().is_none());
        assert_eq!(sender.sent().len(), 1);
    }
}
