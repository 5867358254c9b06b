//! Wall-clock seam.
//!
//! Countdown ticks, locale settle deadlines and particle expiries are all
//! computed from `Clock::now`, so a test clock drives every timed effect of
//! the page.

use chrono::{DateTime, Utc};

/// Source of the current instant for every scheduled page effect.
pub trait Clock: Send + Sync {
    /// Returns the current instant in UTC.
    fn now(&self) -> DateTime<Utc>;
}

/// Clock backed by the system time, used by the headless driver.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
