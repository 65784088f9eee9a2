//! Persisted key-value slots.
//!
//! The session reads and writes small string values (the last-login time)
//! through [`KeyValueStore`], so the engine never touches a host API directly.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::core::error::StorageError;

/// A string-keyed slot store such as `localStorage` or a state file.
pub trait KeyValueStore {
    /// Read a value. Missing keys and unavailable storage both give `None`.
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Store that lives as long as the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
