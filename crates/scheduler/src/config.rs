//! Scheduler configuration.

use std::time::Duration;

use chrono::NaiveTime;

use crate::error::{Result, SchedulerError};

const DEFAULT_TICK_SECS: u64 = 20;
const DEFAULT_MORNING_TIME: &str = "06:00";

/// Configuration for the periodic loops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// How often both loops wake up. Must be under a minute so no
    /// matching minute is skipped.
    pub tick: Duration,
    /// Local wall-clock time of the morning broadcast.
    pub morning_time: NaiveTime,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            tick: Duration::from_secs(DEFAULT_TICK_SECS),
            morning_time: NaiveTime::from_hms_opt(6, 0, 0).unwrap_or_default(),
        }
    }
}

impl SchedulerConfig {
    /// Load configuration from environment variables.
    ///
    /// Optional:
    /// - `NIKORI_TICK_SECS`: seconds between ticks, 1..=59 (default: 20)
    /// - `NIKORI_MORNING_TIME`: `HH:MM` (default: 06:00)
    pub fn from_env() -> Result<Self> {
        let tick_secs = match std::env::var("NIKORI_TICK_SECS") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| (1..60).contains(secs))
                .ok_or_else(|| {
                    SchedulerError::Config(format!("NIKORI_TICK_SECS must be 1-59, got {raw:?}"))
                })?,
            Err(_) => DEFAULT_TICK_SECS,
        };

        let morning_raw = std::env::var("NIKORI_MORNING_TIME")
            .unwrap_or_else(|_| DEFAULT_MORNING_TIME.to_string());
        let morning_time = parse_hhmm(&morning_raw)?;

        Ok(Self {
            tick: Duration::from_secs(tick_secs),
            morning_time,
        })
    }

    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    pub fn with_morning_time(mut self, morning_time: NaiveTime) -> Self {
        self.morning_time = morning_time;
        self
    }
}

fn parse_hhmm(raw: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M").map_err(|_| {
        SchedulerError::Config(format!("NIKORI_MORNING_TIME must be HH:MM, got {raw:?}"))
    })
}
