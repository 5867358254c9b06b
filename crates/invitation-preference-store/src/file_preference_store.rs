//! JSON file implementation of the `PreferenceStore` trait.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use invitation_core::error::PageError;
use invitation_core::preference::PreferenceStore;
use tracing::{debug, warn};

/// Preference store persisting a flat JSON object to one file.
///
/// The file is read once when the store is opened. A missing file is an
/// empty store; an unreadable or malformed one is logged and treated as
/// empty, and is overwritten by the next save.
#[derive(Debug, Clone)]
pub struct FilePreferenceStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FilePreferenceStore {
    /// Opens the store backed by `path`.
    #[must_use]
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = read_values(&path);
        debug!(path = %path.display(), entries = values.len(), "preference store opened");
        Self { path, values }
    }

    /// Backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn read_values(path: &Path) -> BTreeMap<String, String> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => return BTreeMap::new(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "preference file unreadable; starting empty");
            return BTreeMap::new();
        }
    };
    serde_json::from_str(&raw).unwrap_or_else(|e| {
        warn!(path = %path.display(), error = %e, "preference file malformed; starting empty");
        BTreeMap::new()
    })
}

impl PreferenceStore for FilePreferenceStore {
    fn load(&self, key: &str) -> Result<Option<String>, PageError> {
        Ok(self.values.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), PageError> {
        let mut next = self.values.clone();
        next.insert(key.to_owned(), value.to_owned());
        let body = serde_json::to_string_pretty(&next)
            .map_err(|e| PageError::Store(e.to_string()))?;
        if let Some(dir) = self.path.parent()
            && !dir.as_os_str().is_empty()
        {
            fs::create_dir_all(dir)
                .map_err(|e| PageError::Store(format!("{}: {e}", dir.display())))?;
        }
        fs::write(&self.path, body)
            .map_err(|e| PageError::Store(format!("{}: {e}", self.path.display())))?;
        self.values = next;
        debug!(key, value, "preference saved");
        Ok(())
    }
}
