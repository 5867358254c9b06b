//! Preference store abstraction.
//!
//! The page persists exactly one value: the visitor's locale. The store is a
//! plain key-value seam so the browser's local storage, a file on disk or an
//! in-memory map can stand behind it.

use crate::error::PageError;

/// Key under which the locale preference is stored.
pub const LOCALE_PREFERENCE_KEY: &str = "invitation.locale";

/// Key-value store for visitor preferences that survive reloads.
pub trait PreferenceStore: Send + Sync {
    /// Reads the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `PageError::Store` if the backing storage cannot be read.
    fn load(&self, key: &str) -> Result<Option<String>, PageError>;

    /// Writes `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `PageError::Store` if the backing storage cannot be written.
    fn save(&mut self, key: &str, value: &str) -> Result<(), PageError>;
}
