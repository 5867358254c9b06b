//! Driver configuration read from the environment.

use std::path::PathBuf;

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};
use invitation_countdown::application::controller::{CountdownConfig, DEFAULT_ARRIVED_MESSAGE};
use invitation_feedback::application::controller::DEFAULT_BURST_SIZE;

use crate::error::AppError;

/// Path of the page manifest; the bundled page is used when unset.
pub const MANIFEST_VAR: &str = "INVITATION_MANIFEST";
/// Path of the preference file.
pub const PREFS_PATH_VAR: &str = "INVITATION_PREFS_PATH";
/// Local date-time of the event, `YYYY-MM-DDTHH:MM:SS`.
pub const TARGET_VAR: &str = "INVITATION_TARGET";
/// UTC offset the event date-time is expressed in, `+HH:MM` or `-HH:MM`.
pub const UTC_OFFSET_VAR: &str = "INVITATION_UTC_OFFSET";
/// Text shown once the event has arrived.
pub const ARRIVED_MESSAGE_VAR: &str = "INVITATION_ARRIVED_MESSAGE";
/// Particles per confetti burst.
pub const BURST_SIZE_VAR: &str = "INVITATION_BURST_SIZE";

const DEFAULT_PREFS_PATH: &str = "invitation-prefs.json";
const DEFAULT_TARGET: &str = "2026-02-10T00:00:00";
const DEFAULT_UTC_OFFSET: &str = "+00:00";
const TARGET_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Resolved driver configuration.
#[derive(Debug, Clone)]
pub struct PageConfig {
    /// Manifest to load instead of the bundled page.
    pub manifest_path: Option<PathBuf>,
    /// Preference file.
    pub prefs_path: PathBuf,
    /// Event instant.
    pub target: DateTime<Utc>,
    /// Text shown once the event has arrived.
    pub arrived_message: String,
    /// Particles per confetti burst.
    pub burst_size: usize,
}

impl PageConfig {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the configuration through `lookup`, which returns the value of
    /// a variable or `None` when it is unset.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is set to an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let naive_target = lookup(TARGET_VAR).unwrap_or_else(|| DEFAULT_TARGET.to_owned());
        let naive_target = NaiveDateTime::parse_from_str(naive_target.trim(), TARGET_FORMAT)
            .map_err(|e| {
                AppError::Config(format!("{TARGET_VAR} must look like {DEFAULT_TARGET}: {e}"))
            })?;
        let offset = lookup(UTC_OFFSET_VAR).unwrap_or_else(|| DEFAULT_UTC_OFFSET.to_owned());
        let offset = parse_utc_offset(&offset).ok_or_else(|| {
            AppError::Config(format!("{UTC_OFFSET_VAR} must look like +02:00, got {offset:?}"))
        })?;
        let target = offset
            .from_local_datetime(&naive_target)
            .single()
            .ok_or_else(|| AppError::Config(format!("{TARGET_VAR} is not a valid local time")))?
            .with_timezone(&Utc);

        let burst_size = match lookup(BURST_SIZE_VAR) {
            Some(raw) => raw.trim().parse().map_err(|e| {
                AppError::Config(format!("{BURST_SIZE_VAR} must be a non-negative integer: {e}"))
            })?,
            None => DEFAULT_BURST_SIZE,
        };

        Ok(Self {
            manifest_path: lookup(MANIFEST_VAR)
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
            prefs_path: lookup(PREFS_PATH_VAR)
                .filter(|p| !p.trim().is_empty())
                .map_or_else(|| PathBuf::from(DEFAULT_PREFS_PATH), PathBuf::from),
            target,
            arrived_message: lookup(ARRIVED_MESSAGE_VAR)
                .unwrap_or_else(|| DEFAULT_ARRIVED_MESSAGE.to_owned()),
            burst_size,
        })
    }

    /// Countdown settings derived from this configuration.
    #[must_use]
    pub fn countdown(&self) -> CountdownConfig {
        CountdownConfig {
            target: self.target,
            arrived_message: self.arrived_message.clone(),
        }
    }
}

/// Parses `+HH:MM`, `-HH:MM` or `Z`.
fn parse_utc_offset(raw: &str) -> Option<FixedOffset> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("z") {
        return FixedOffset::east_opt(0);
    }
    let (sign, rest) = match raw.as_bytes().first().copied()? {
        b'+' => (1, &raw[1..]),
        b'-' => (-1, &raw[1..]),
        _ => return None,
    };
    let (hours, minutes) = rest.split_once(':')?;
    if hours.len() != 2 || minutes.len() != 2 {
        return None;
    }
    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3_600 + minutes * 60))
}
