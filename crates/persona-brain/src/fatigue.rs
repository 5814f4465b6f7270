//! Fatigue ladder for rate-limited replies.

use std::sync::Mutex;

use rand::seq::SliceRandom;

use crate::locale::LocaleProfile;

/// How tired the persona is.
///
/// Derived from the number of quota failures since the last morning
/// broadcast and the locale's stock of tired lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FatigueLevel {
    #[default]
    Awake,
    /// First failure, first tired line.
    Tired,
    /// A later tired line from the stock.
    Complaining,
    /// Stock exhausted; a dream vignette instead.
    Dreaming,
}

impl FatigueLevel {
    /// Level after `failures` quota failures with `stock` tired lines.
    pub fn after(failures: usize, stock: usize) -> Self {
        match failures {
            0 => FatigueLevel::Awake,
            n if n > stock => FatigueLevel::Dreaming,
            1 => FatigueLevel::Tired,
            _ => FatigueLevel::Complaining,
        }
    }
}

/// The fallback line for the `failures`-th quota failure.
///
/// Walks `tired_lines` in order, then picks a random dream once they run out.
pub fn fatigue_line(failures: usize, profile: &LocaleProfile) -> String {
    let stock = failures
        .checked_sub(1)
        .and_then(|i| profile.tired_lines.get(i));

    match stock {
        Some(line) => line.to_string(),
        None => profile
            .dreams
            .choose(&mut rand::thread_rng())
            .map(|dream| dream.render())
            .unwrap_or_else(|| profile.generic_error.to_string()),
    }
}

/// Process-wide fatigue state shared by the reply engine and the morning
/// broadcast.
#[derive(Debug, Default)]
pub struct FatigueLadder {
    failures: Mutex<usize>,
}

impl FatigueLadder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Quota failures since the last reset.
    pub fn failures(&self) -> usize {
        *self.failures.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Count one more quota failure and return the new total.
    pub fn advance(&self) -> usize {
        let mut failures = self.failures.lock().unwrap_or_else(|e| e.into_inner());
        *failures = failures.saturating_add(1);
        *failures
    }

    /// Back to awake.
    pub fn reset(&self) {
        *self.failures.lock().unwrap_or_else(|e| e.into_inner()) = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::JAPANESE;

    #[test]
    fn test_ladder_counts_and_resets() {
        let ladder = FatigueLadder::new();
        assert_eq!(ladder.failures(), 0);
        assert_eq!(ladder.advance(), 1);
        assert_eq!(ladder.advance(), 2);
        assert_eq!(ladder.advance(), 3);

        ladder.reset();
        assert_eq!(ladder.failures(), 0);
    }

    #[test]
    fn test_levels_follow_stock_size() {
        assert_eq!(FatigueLevel::after(0, 2), FatigueLevel::Awake);
        assert_eq!(FatigueLevel::after(1, 2), FatigueLevel::Tired);
        assert_eq!(FatigueLevel::after(2, 2), FatigueLevel::Complaining);
        assert_eq!(FatigueLevel::after(3, 2), FatigueLevel::Dreaming);

        assert_eq!(FatigueLevel::after(3, 3), FatigueLevel::Complaining);
        assert_eq!(FatigueLevel::after(1, 0), FatigueLevel::Dreaming);
    }

    #[test]
    fn test_lines_per_failure() {
        assert_eq!(fatigue_line(1, &JAPANESE), JAPANESE.tired_lines[0]);
        assert_eq!(fatigue_line(2, &JAPANESE), JAPANESE.tired_lines[1]);

        let dream = fatigue_line(3, &JAPANESE);
        assert!(dream.starts_with("💤 "));
        assert!(JAPANESE.dreams.iter().any(|d| d.render() == dream));
    }

    #[test]
    fn test_every_stock_line_is_used_before_dreaming() {
        let profile = LocaleProfile {
            tired_lines: &["one", "two", "three"],
            ..JAPANESE
        };

        assert_eq!(fatigue_line(3, &profile), "three");
        assert_eq!(FatigueLevel::after(3, profile.tired_lines.len()), FatigueLevel::Complaining);
        assert!(fatigue_line(4, &profile).starts_with("💤 "));
    }
}
