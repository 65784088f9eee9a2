//! DOM and Web API utility functions.
//!
//! Provides safe, consistent access to browser APIs with proper error handling.

use web_sys::{Storage, Window};

use super::KeyValueStore;
use crate::core::error::StorageError;

/// Get the browser window object.
#[inline]
pub fn window() -> Option<Window> {
    web_sys::window()
}

/// Get localStorage.
#[inline]
pub fn local_storage() -> Option<Storage> {
    window()?.local_storage().ok()?
}

/// Log a warning to the browser console.
pub fn console_warn(message: &str) {
    web_sys::console::warn_1(&message.into());
}

/// [`KeyValueStore`] backed by `localStorage`.
///
/// Storage can be missing (privacy modes, sandboxed frames); reads then come
/// back empty and writes report [`StorageError::Unavailable`].
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalStore;

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Option<String> {
        local_storage()?.get_item(key).ok()?
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let storage = local_storage().ok_or(StorageError::Unavailable)?;
        storage.set_item(key, value).map_err(|err| {
            let message = err.as_string().unwrap_or_else(|| "unknown error".to_string());
            console_warn(&format!("localStorage write failed: {}", message));
            StorageError::WriteFailed(message)
        })
    }
}
