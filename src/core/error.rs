//! Error types for the shell engine.
//!
//! - [`ShellError`] - Per-command failures, rendered as a message line
//! - [`FsError`] - Path resolution failures, before a command name is attached
//! - [`FetchError`] - Transport failures while loading content
//! - [`ManifestError`] - Malformed filesystem definitions (fatal at startup)
//! - [`StorageError`] - Key-value slot failures

use thiserror::Error;

/// Failures that end the current command. Each one is shown to the user as
/// its `Display` text and the shell returns to the prompt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShellError {
    /// Missing required argument. Holds the usage synopsis.
    #[error("Usage: {0}")]
    Usage(&'static str),
    /// A directory path did not resolve. `path` is the argument as typed.
    #[error("{command}: {path}: No such directory")]
    NoSuchDirectory { command: &'static str, path: String },
    /// A file path did not resolve to a file.
    #[error("{command}: {path}: No such file")]
    NoSuchFile { command: &'static str, path: String },
    /// A file operation named a directory.
    #[error("{command}: {path}: Is a directory")]
    IsADirectory { command: &'static str, path: String },
    #[error("Command not found: {0}\nType 'help' for available commands.")]
    UnknownCommand(String),
    /// The cursor no longer names a directory of the tree.
    #[error("shell: working directory {0} is unavailable")]
    CursorInvalid(String),
}

/// Path resolution failures from [`VirtualFs`](crate::core::VirtualFs).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FsError {
    /// Holds the path exactly as requested, not the failing segment.
    #[error("{0}: No such directory")]
    NoSuchDirectory(String),
    #[error("working directory {0} is unavailable")]
    CursorInvalid(String),
}

impl FsError {
    /// Attach the command name for display.
    pub fn for_command(self, command: &'static str) -> ShellError {
        match self {
            Self::NoSuchDirectory(path) => ShellError::NoSuchDirectory { command, path },
            Self::CursorInvalid(path) => ShellError::CursorInvalid(path),
        }
    }
}

/// Transport failures reported by a [`Transport`](crate::core::Transport).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Resource does not exist
    #[error("404 Not Found")]
    NotFound,
    /// Non-success response
    #[error("{status} {reason}")]
    HttpError { status: u16, reason: String },
    /// The request could not be made or the body could not be read
    #[error("{0}")]
    Transport(String),
}

impl FetchError {
    /// Whether the failure is a response status rather than a broken transport.
    pub fn is_status(&self) -> bool {
        matches!(self, Self::NotFound | Self::HttpError { .. })
    }
}

/// A manifest that cannot form a valid tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ManifestError {
    #[error("manifest path '{0}' has an empty segment")]
    EmptySegment(String),
    #[error("manifest path '{path}' is blocked by file '{blocker}'")]
    BlockedByFile { path: String, blocker: String },
    #[error("manifest path '{0}' is declared twice")]
    Duplicate(String),
    #[error("invalid manifest: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for ManifestError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

/// Key-value slot errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("storage not available")]
    Unavailable,
    #[error("failed to save to storage: {0}")]
    WriteFailed(String),
}
