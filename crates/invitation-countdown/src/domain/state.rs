//! Countdown state machine.

use chrono::{DateTime, Utc};

use super::remaining::Remaining;

/// Display fields, in the order `Remaining::digits` produces them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// Days.
    Days,
    /// Hours.
    Hours,
    /// Minutes.
    Minutes,
    /// Seconds.
    Seconds,
}

impl Field {
    /// All fields in display order.
    pub const ALL: [Self; 4] = [Self::Days, Self::Hours, Self::Minutes, Self::Seconds];

    /// Identifier of the display element for this field.
    #[must_use]
    pub fn element_id(self) -> &'static str {
        match self {
            Self::Days => "days",
            Self::Hours => "hours",
            Self::Minutes => "minutes",
            Self::Seconds => "seconds",
        }
    }
}

/// What a tick asks the presentation layer to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Rewrite the listed fields.
    Update {
        /// Freshly computed remaining time.
        remaining: Remaining,
        /// Fields whose text differs from what was last written.
        updates: Vec<(Field, String)>,
    },
    /// Replace the display with the arrived message.
    Arrive,
    /// Nothing to do; already arrived.
    Idle,
}

/// Countdown toward a fixed target instant.
///
/// `arrived` is a one-way flag owned here rather than read back from the
/// display, so repeated ticks past the target cannot re-trigger anything.
#[derive(Debug, Clone)]
pub struct CountdownState {
    target: DateTime<Utc>,
    last_written: [Option<String>; 4],
    arrived: bool,
}

impl CountdownState {
    /// Creates a countdown toward `target`.
    #[must_use]
    pub fn new(target: DateTime<Utc>) -> Self {
        Self {
            target,
            last_written: [None, None, None, None],
            arrived: false,
        }
    }

    /// Target instant.
    #[must_use]
    pub fn target(&self) -> DateTime<Utc> {
        self.target
    }

    /// Whether the target has been reached.
    #[must_use]
    pub fn has_arrived(&self) -> bool {
        self.arrived
    }

    /// Advances the state to `now`.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Step {
        if self.arrived {
            return Step::Idle;
        }
        let Some(remaining) = Remaining::from_delta(self.target - now) else {
            self.arrived = true;
            return Step::Arrive;
        };

        let updates = Field::ALL
            .into_iter()
            .zip(remaining.digits())
            .enumerate()
            .filter_map(|(idx, (field, text))| {
                if self.last_written[idx].as_deref() == Some(text.as_str()) {
                    return None;
                }
                self.last_written[idx] = Some(text.clone());
                Some((field, text))
            })
            .collect();

        Step::Update { remaining, updates }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone};

    fn target() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 10, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_first_tick_writes_every_field() {
        let mut state = CountdownState::new(target());

        let step = state.tick(target() - TimeDelta::seconds(60));

        let Step::Update { updates, .. } = step else {
            panic!("expected Update, got {step:?}");
        };
        assert_eq!(
            updates,
            vec![
                (Field::Days, "00".to_owned()),
                (Field::Hours, "00".to_owned()),
                (Field::Minutes, "01".to_owned()),
                (Field::Seconds, "00".to_owned()),
            ]
        );
    }

    #[test]
    fn test_unchanged_fields_are_skipped() {
        let mut state = CountdownState::new(target());
        state.tick(target() - TimeDelta::seconds(60));

        let step = state.tick(target() - TimeDelta::seconds(59));

        let Step::Update { updates, .. } = step else {
            panic!("expected Update, got {step:?}");
        };
        assert_eq!(
            updates,
            vec![
                (Field::Minutes, "00".to_owned()),
                (Field::Seconds, "59".to_owned()),
            ]
        );
    }

    #[test]
    fn test_tick_within_same_second_changes_nothing() {
        let mut state = CountdownState::new(target());
        state.tick(target() - TimeDelta::milliseconds(30_900));

        let step = state.tick(target() - TimeDelta::milliseconds(30_100));

        assert!(matches!(step, Step::Update { ref updates, .. } if updates.is_empty()));
    }

    #[test]
    fn test_arrival_is_one_way() {
        let mut state = CountdownState::new(target());

        assert_eq!(state.tick(target()), Step::Arrive);
        assert!(state.has_arrived());
        assert_eq!(state.tick(target() + TimeDelta::seconds(1)), Step::Idle);
        // Even a clock that jumps backwards cannot revive the countdown.
        assert_eq!(state.tick(target() - TimeDelta::days(1)), Step::Idle);
    }

    #[test]
    fn test_already_elapsed_target_arrives_on_first_tick() {
        let mut state = CountdownState::new(target());

        assert_eq!(state.tick(target() + TimeDelta::days(200)), Step::Arrive);
    }
}
