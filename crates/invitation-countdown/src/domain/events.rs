//! Outcomes reported by the countdown controller.

use super::remaining::Remaining;

/// Result of one countdown tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Time is still left; `changed` counts the fields rewritten this tick.
    Running {
        /// Freshly computed remaining time.
        remaining: Remaining,
        /// Number of display fields whose text changed.
        changed: usize,
    },
    /// The target was reached on this tick. Reported exactly once.
    Arrived,
    /// The target was reached on an earlier tick; nothing was done.
    AlreadyArrived,
}

impl TickOutcome {
    /// Whether this tick performed the one-way transition to arrived.
    #[must_use]
    pub fn just_arrived(&self) -> bool {
        matches!(self, Self::Arrived)
    }
}
