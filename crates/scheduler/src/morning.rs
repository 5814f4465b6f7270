//! Morning broadcast.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use broadcaster::{BroadcastReport, Broadcaster, Delivery, MessageSender};
use chrono::{Local, NaiveDateTime, NaiveTime, Timelike};
use database::{fatigue, Database};
use persona_brain::{FatigueLadder, SettingsResolver};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info};

use crate::error::Result;
use crate::guard::MinuteGuard;

/// Sends the morning greeting and wakes the persona up.
pub struct MorningBroadcast<S> {
    db: Arc<Database>,
    settings: SettingsResolver,
    fatigue: Arc<FatigueLadder>,
    broadcaster: Broadcaster<S>,
    at: NaiveTime,
    guard: MinuteGuard,
}

impl<S: MessageSender> MorningBroadcast<S> {
    pub fn new(
        db: Arc<Database>,
        fatigue: Arc<FatigueLadder>,
        broadcaster: Broadcaster<S>,
        at: NaiveTime,
    ) -> Self {
        Self {
            settings: SettingsResolver::new(db.clone()),
            db,
            fatigue,
            broadcaster,
            at,
            guard: MinuteGuard::new(),
        }
    }

    /// Configured broadcast time.
    pub fn at(&self) -> NaiveTime {
        self.at
    }

    /// Fire if `now` falls in the broadcast minute and it has not fired yet
    /// during that minute.
    ///
    /// Greets every opted-in user, then clears the fatigue log and resets
    /// the ladder to awake. Returns `None` when nothing fired.
    pub async fn tick(&self, now: NaiveDateTime) -> Result<Option<BroadcastReport>> {
        if now.hour() != self.at.hour() || now.minute() != self.at.minute() {
            return Ok(None);
        }
        if !self.guard.try_enter(now) {
            return Ok(None);
        }

        let deliveries: Vec<Delivery> = self
            .settings
            .morning_recipients()
            .await
            .into_iter()
            .map(|(user_id, locale)| Delivery::new(user_id, locale.profile().morning_greeting))
            .collect();

        info!(recipients = deliveries.len(), "Sending morning greetings");
        let report = self.broadcaster.broadcast_direct(deliveries).await;

        self.fatigue.reset();
        fatigue::clear_fatigue(&self.db).await?;
        info!("Fatigue reset for the new day");

        Ok(Some(report))
    }

    /// Tick every `period` until `shutdown` completes.
    pub async fn run_with_shutdown<F>(&self, period: Duration, shutdown: F)
    where
        F: Future<Output = ()> + Send,
    {
        tokio::pin!(shutdown);
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(at = %self.at.format("%H:%M"), "Starting morning loop");
        loop {
            tokio::select! {
                biased;

                _ = &mut shutdown => {
                    info!("Morning loop shutting down");
                    return;
                }

                _ = ticker.tick() => {
                    if let Err(e) = self.tick(Local::now().naive_local()).await {
                        error!("Morning tick failed: {}", e);
                    }
                }
            }
        }
    }
}
