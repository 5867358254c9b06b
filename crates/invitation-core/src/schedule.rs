//! Timer primitives.
//!
//! Everything that waits on the page is a scheduled continuation: particles
//! expire, locale fades complete, the countdown ticks. `TimerQueue` holds the
//! one-shot continuations and `RecurringTask` the periodic one; both are owned
//! by the page runtime, which is also their only cancellation point.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use chrono::{DateTime, TimeDelta, Utc};
use tracing::debug;

#[derive(Debug)]
struct Entry<T> {
    due: DateTime<Utc>,
    seq: u64,
    task: T,
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Entry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.due
            .cmp(&other.due)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

/// Min-heap of one-shot tasks keyed by due time.
///
/// Tasks due at the same instant pop in scheduling order.
#[derive(Debug)]
pub struct TimerQueue<T> {
    entries: BinaryHeap<Reverse<Entry<T>>>,
    next_seq: u64,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerQueue<T> {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    /// Schedules `task` to become due at `due`.
    pub fn schedule(&mut self, due: DateTime<Utc>, task: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push(Reverse(Entry { due, seq, task }));
    }

    /// Earliest pending deadline.
    #[must_use]
    pub fn next_due(&self) -> Option<DateTime<Utc>> {
        self.entries.peek().map(|Reverse(entry)| entry.due)
    }

    /// Removes and returns every task due at or before `now`, earliest first.
    pub fn pop_due(&mut self, now: DateTime<Utc>) -> Vec<T> {
        let mut due = Vec::new();
        while self
            .entries
            .peek()
            .is_some_and(|Reverse(entry)| entry.due <= now)
        {
            if let Some(Reverse(entry)) = self.entries.pop() {
                due.push(entry.task);
            }
        }
        due
    }

    /// Number of pending tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A periodic task with a single owner.
///
/// Missed periods are coalesced: if the owner polls late, the task fires once
/// and the next deadline is moved to the first period boundary after `now`.
#[derive(Debug, Clone)]
pub struct RecurringTask {
    name: &'static str,
    period: TimeDelta,
    next_due: DateTime<Utc>,
    cancelled: bool,
}

impl RecurringTask {
    /// Creates a task first due at `first_due`.
    ///
    /// A non-positive `period` is raised to one millisecond.
    #[must_use]
    pub fn new(name: &'static str, first_due: DateTime<Utc>, period: TimeDelta) -> Self {
        let period = if period > TimeDelta::zero() {
            period
        } else {
            TimeDelta::milliseconds(1)
        };
        Self {
            name,
            period,
            next_due: first_due,
            cancelled: false,
        }
    }

    /// Task name, for logging.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Configured period.
    #[must_use]
    pub fn period(&self) -> TimeDelta {
        self.period
    }

    /// Next deadline, or `None` once cancelled.
    #[must_use]
    pub fn next_due(&self) -> Option<DateTime<Utc>> {
        (!self.cancelled).then_some(self.next_due)
    }

    /// Returns `true` and advances the deadline if the task is due at `now`.
    pub fn poll(&mut self, now: DateTime<Utc>) -> bool {
        if self.cancelled || now < self.next_due {
            return false;
        }
        let mut skipped = 0_u32;
        self.next_due += self.period;
        while self.next_due <= now {
            self.next_due += self.period;
            skipped += 1;
        }
        if skipped > 0 {
            debug!(task = self.name, skipped, "recurring task fell behind");
        }
        true
    }

    /// Stops the task permanently.
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    /// Whether the task has been cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, secs).unwrap()
    }

    #[test]
    fn test_pop_due_returns_in_deadline_order() {
        let mut queue = TimerQueue::new();
        queue.schedule(at(5), "late");
        queue.schedule(at(1), "early");
        queue.schedule(at(3), "middle");

        assert_eq!(queue.next_due(), Some(at(1)));
        assert_eq!(queue.pop_due(at(3)), vec!["early", "middle"]);
        assert_eq!(queue.len(), 1);
        assert!(queue.pop_due(at(4)).is_empty());
        assert_eq!(queue.pop_due(at(59)), vec!["late"]);
        assert!(queue.is_empty());
        assert_eq!(queue.next_due(), None);
    }

    #[test]
    fn test_same_deadline_pops_in_scheduling_order() {
        let mut queue = TimerQueue::new();
        for label in ["a", "b", "c", "d"] {
            queue.schedule(at(2), label);
        }

        assert_eq!(queue.pop_due(at(2)), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_recurring_task_fires_once_per_period() {
        let mut task = RecurringTask::new("countdown", at(0), TimeDelta::seconds(1));

        assert!(task.poll(at(0)));
        assert!(!task.poll(at(0)));
        assert_eq!(task.next_due(), Some(at(1)));
        assert!(task.poll(at(1)));
        assert_eq!(task.next_due(), Some(at(2)));
    }

    #[test]
    fn test_recurring_task_coalesces_missed_periods() {
        let mut task = RecurringTask::new("countdown", at(0), TimeDelta::seconds(1));

        assert!(task.poll(at(7)));
        assert_eq!(task.next_due(), Some(at(8)));
        assert!(!task.poll(at(7)));
    }

    #[test]
    fn test_cancelled_task_never_fires() {
        let mut task = RecurringTask::new("countdown", at(0), TimeDelta::seconds(1));
        task.cancel();

        assert!(task.is_cancelled());
        assert!(!task.poll(at(30)));
        assert_eq!(task.next_due(), None);
    }

    #[test]
    fn test_non_positive_period_is_raised() {
        let task = RecurringTask::new("countdown", at(0), TimeDelta::zero());
        assert_eq!(task.period(), TimeDelta::milliseconds(1));
        assert_eq!(task.name(), "countdown");
    }
}
