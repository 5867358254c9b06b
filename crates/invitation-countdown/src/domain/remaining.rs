//! Calendar decomposition of a remaining duration.

use chrono::TimeDelta;
use serde::Serialize;

const MS_PER_SECOND: i64 = 1_000;
const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

/// Whole days, hours, minutes and seconds left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Remaining {
    /// Whole days, unbounded.
    pub days: u64,
    /// Hours past the last whole day, 0–23.
    pub hours: u8,
    /// Minutes past the last whole hour, 0–59.
    pub minutes: u8,
    /// Seconds past the last whole minute, 0–59.
    pub seconds: u8,
}

impl Remaining {
    /// Decomposes a positive duration with floor division. Returns `None` for
    /// zero or negative durations, which mean the target has arrived.
    #[must_use]
    #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
    pub fn from_delta(delta: TimeDelta) -> Option<Self> {
        let ms = delta.num_milliseconds();
        if ms <= 0 {
            return None;
        }
        // Every operand is positive here, so the casts cannot lose sign and
        // the moduli keep the narrow fields in range.
        Some(Self {
            days: (ms / MS_PER_DAY) as u64,
            hours: ((ms % MS_PER_DAY) / MS_PER_HOUR) as u8,
            minutes: ((ms % MS_PER_HOUR) / MS_PER_MINUTE) as u8,
            seconds: ((ms % MS_PER_MINUTE) / MS_PER_SECOND) as u8,
        })
    }

    /// Total whole seconds represented.
    #[must_use]
    pub fn total_seconds(&self) -> u64 {
        self.days * 86_400
            + u64::from(self.hours) * 3_600
            + u64::from(self.minutes) * 60
            + u64::from(self.seconds)
    }

    /// Display strings, zero-padded to at least two digits, in
    /// days/hours/minutes/seconds order.
    #[must_use]
    pub fn digits(&self) -> [String; 4] {
        [
            format!("{:02}", self.days),
            format!("{:02}", self.hours),
            format!("{:02}", self.minutes),
            format!("{:02}", self.seconds),
        ]
    }
}
