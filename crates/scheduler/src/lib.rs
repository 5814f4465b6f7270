//! Periodic jobs for nikorihito.
//!
//! Two independent loops share the store:
//!
//! - [`ReminderScheduler`] delivers reminders whose `HH:MM` matches the
//!   current minute, removing one-shot entries.
//! - [`MorningBroadcast`] greets opted-in users at the configured time and
//!   resets the persona's fatigue.
//!
//! Reminders are registered with [`register`], the same store operation the
//! slash command uses.
//!
//! Both wake several times a minute and use a [`MinuteGuard`] so each
//! minute is handled once.

mod config;
mod error;
mod guard;
mod morning;
mod reminders;

pub use config::SchedulerConfig;
pub use database::reminder::register;
pub use error::{Result, SchedulerError};
pub use guard::MinuteGuard;
pub use morning::MorningBroadcast;
pub use reminders::{ReminderScheduler, TickReport};

/// Crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
