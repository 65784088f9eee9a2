//! Utility modules for storage, formatting and browser glue.
//!
//! Provides:
//! - [`KeyValueStore`] - Persisted string slots, with [`MemoryStore`]
//! - [`format_login_time`] - Last-login banner timestamps
//! - `dom`, `fetch` - `localStorage` and Fetch API bindings (wasm32 only)

#[cfg(target_arch = "wasm32")]
pub mod dom;
#[cfg(target_arch = "wasm32")]
pub mod fetch;
mod format;
mod storage;

pub use format::{format_candidates, format_login_time};
pub use storage::{KeyValueStore, MemoryStore};
