//! Test preference stores — mock `PreferenceStore` implementations for tests.

use std::collections::HashMap;

use invitation_core::error::PageError;
use invitation_core::preference::PreferenceStore;

/// An in-memory store that records every save.
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    values: HashMap<String, String>,
    saves: Vec<(String, String)>,
}

impl MemoryPreferenceStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store already holding `key = value`.
    #[must_use]
    pub fn with_value(key: &str, value: &str) -> Self {
        let mut store = Self::new();
        store.values.insert(key.to_owned(), value.to_owned());
        store
    }

    /// Current value under `key`.
    #[must_use]
    pub fn value(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Every `(key, value)` pair saved so far, in order.
    #[must_use]
    pub fn saves(&self) -> &[(String, String)] {
        &self.saves
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn load(&self, key: &str) -> Result<Option<String>, PageError> {
        Ok(self.values.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), PageError> {
        self.values.insert(key.to_owned(), value.to_owned());
        self.saves.push((key.to_owned(), value.to_owned()));
        Ok(())
    }
}

/// A store whose every operation fails. Useful for testing that storage
/// trouble never breaks the page.
#[derive(Debug)]
pub struct FailingPreferenceStore;

impl PreferenceStore for FailingPreferenceStore {
    fn load(&self, _key: &str) -> Result<Option<String>, PageError> {
        Err(PageError::Store("storage unavailable".into()))
    }

    fn save(&mut self, _key: &str, _value: &str) -> Result<(), PageError> {
        Err(PageError::Store("storage unavailable".into()))
    }
}
