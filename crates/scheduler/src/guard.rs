//! Once-per-minute firing guard.

use std::sync::Mutex;

use chrono::{NaiveDateTime, Timelike};

/// Lets a tick through at most once per wall-clock minute.
///
/// Loops wake several times a minute; only the first wake-up in a given
/// minute does any work.
#[derive(Debug, Default)]
pub struct MinuteGuard {
    last: Mutex<Option<NaiveDateTime>>,
}

impl MinuteGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` the first time it is called within `now`'s minute.
    pub fn try_enter(&self, now: NaiveDateTime) -> bool {
        let minute = truncate_to_minute(now);
        let mut last = self.last.lock().unwrap_or_else(|e| e.into_inner());
        if *last == Some(minute) {
            return false;
        }
        *last = Some(minute);
        true
    }
}

fn truncate_to_minute(now: NaiveDateTime) -> NaiveDateTime {
    now.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 1)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn test_once_per_minute() {
        let guard = MinuteGuard::new();
        assert!(guard.try_enter(at(8, 0, 1)));
        assert!(!guard.try_enter(at(8, 0, 21)));
        assert!(!guard.try_enter(at(8, 0, 59)));
        assert!(guard.try_enter(at(8, 1, 0)));
    }

    #[test]
    fn test_same_minute_next_day() {
        let guard = MinuteGuard::new();
        let today = at(6, 0, 0);
        assert!(guard.try_enter(today));
        assert!(guard.try_enter(today + chrono::Duration::days(1)));
    }
}
