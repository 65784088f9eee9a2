//! Data models shared by the shell engine and its hosts.
//!
//! Contains domain types for:
//! - [`FsNode`], [`Directory`], [`Manifest`] - Virtual filesystem representation
//! - [`NavigationState`] - The session's working-directory cursor
//! - [`OutputBlock`] - Output delivered to the render sink

mod filesystem;
mod navigation;
mod terminal;

pub use filesystem::{Directory, DirectoryEntry, FileEntry, FsNode, Manifest};
pub use navigation::NavigationState;
pub use terminal::{OutputBlock, OutputData};
