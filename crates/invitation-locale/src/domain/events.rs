//! Events emitted by the locale controller.

use chrono::{DateTime, Utc};

use super::locale::Locale;

/// Emitted when a locale switch has been applied to the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocaleSwitched {
    /// Locale shown before the switch.
    pub previous: Locale,
    /// Locale shown now.
    pub current: Locale,
    /// Transition generation; only the latest one may settle.
    pub generation: u64,
    /// When the fade finishes and transition classes should be cleared.
    pub settle_at: DateTime<Utc>,
}
