//! Daily fortune draws.

use chrono::NaiveDate;
use database::{draw_log, Database, Result};
use rand::seq::SliceRandom;

use crate::locale::LocaleProfile;

/// The five graded outcomes, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FortuneGrade {
    Great,
    Good,
    Small,
    Late,
    Bad,
}

impl FortuneGrade {
    pub const ALL: [FortuneGrade; 5] = [
        FortuneGrade::Great,
        FortuneGrade::Good,
        FortuneGrade::Small,
        FortuneGrade::Late,
        FortuneGrade::Bad,
    ];

    pub fn text(self, profile: &LocaleProfile) -> &'static str {
        profile.fortunes[self as usize]
    }
}

/// Result of a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawOutcome {
    Drawn(FortuneGrade),
    AlreadyDrawn,
}

/// Draw today's fortune for a user, at most once per date.
pub async fn draw(db: &Database, user_id: &str, today: NaiveDate) -> Result<DrawOutcome> {
    let grade = *FortuneGrade::ALL
        .choose(&mut rand::thread_rng())
        .unwrap_or(&FortuneGrade::Small);
    let date = today.format("%Y-%m-%d").to_string();

    if draw_log::try_record_draw(db, user_id, &date).await? {
        tracing::debug!(user_id = %user_id, ?grade, "fortune drawn");
        Ok(DrawOutcome::Drawn(grade))
    } else {
        Ok(DrawOutcome::AlreadyDrawn)
    }
}
