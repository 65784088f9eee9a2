//! JSON state file.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::warn;
use termsite::KeyValueStore;
use termsite::core::error::StorageError;

/// [`KeyValueStore`] persisted as a flat JSON object.
///
/// The file is read on every access and rewritten on every write. A missing
/// or unreadable file behaves like an empty store.
#[derive(Clone, Debug)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `$HOME/.termsite/state.json`, or `.termsite-state.json` without a home.
    pub fn default_path() -> PathBuf {
        match std::env::var_os("HOME") {
            Some(home) => Path::new(&home).join(".termsite").join("state.json"),
            None => PathBuf::from(".termsite-state.json"),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> BTreeMap<String, String> {
        let Ok(text) = fs::read_to_string(&self.path) else {
            return BTreeMap::new();
        };
        serde_json::from_str(&text).unwrap_or_else(|err| {
            warn!("ignoring corrupt state file {}: {}", self.path.display(), err);
            BTreeMap::new()
        })
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.load().remove(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut values = self.load();
        values.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| StorageError::WriteFailed(e.to_string()))?;
        }
        let json = serde_json::to_string_pretty(&values)
            .map_err(|e| StorageError::WriteFailed(e.to_string()))?;
        fs::write(&self.path, json).map_err(|e| StorageError::WriteFailed(e.to_string()))
    }
}
