//! Application configuration.
//!
//! Centralizes the constants used throughout the shell, plus [`ShellConfig`]
//! for the values a host may override from a TOML file.

use serde::{Deserialize, Serialize};

use crate::models::{FileEntry, Manifest};

// =============================================================================
// Commands
// =============================================================================

/// Commands offered by tab completion, in display order.
pub const VISIBLE_COMMANDS: &[&str] = &["ls", "cd", "cat", "help", "clear"];

/// Commands whose arguments complete as paths.
pub const PATH_COMMANDS: &[&str] = &["ls", "cd", "cat"];

/// Separator used when listing several completion candidates on one line.
pub const COMPLETION_SEPARATOR: &str = "    ";

// =============================================================================
// Content
// =============================================================================

/// Help document loaded by the `help` command.
pub const HELP_FILE: &str = "config/help.txt";

/// Shown when the help document cannot be loaded.
pub const HELP_FALLBACK: &str = "Error loading help content. Please try again.";

/// Prefix of content refs in the built-in tree and in generated manifests.
pub const CONTENT_PREFIX: &str = "content";

/// Content refs rendered as rich text unless the config says otherwise.
pub const DEFAULT_RICH_TEXT: &[&str] = &["content/contact.txt"];

/// Read size for transports that pull from a local file.
pub const READ_CHUNK_SIZE: usize = 8 * 1024;

// =============================================================================
// Session
// =============================================================================

/// Storage key for the last-visit timestamp.
pub const LAST_LOGIN_KEY: &str = "lastLoginTime";

/// Format of the last-login banner timestamp (e.g. `Wed Jun 4 22:50:34`).
pub const LOGIN_TIME_FORMAT: &str = "%a %b %-d %H:%M:%S";

// =============================================================================
// Runtime Configuration
// =============================================================================

/// Host-overridable settings.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Resource loaded by `help`
    pub help_file: String,
    /// Content refs whose output is flagged as rich text
    pub rich_text: Vec<String>,
    /// Prefix used when generating content refs
    pub content_prefix: String,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            help_file: HELP_FILE.to_string(),
            rich_text: DEFAULT_RICH_TEXT.iter().map(|s| s.to_string()).collect(),
            content_prefix: CONTENT_PREFIX.to_string(),
        }
    }
}

impl ShellConfig {
    /// Parse a TOML document; missing keys keep their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(source)
    }

    pub fn is_rich_text(&self, content_ref: &str) -> bool {
        self.rich_text.iter().any(|r| r == content_ref)
    }
}

/// The site tree served when no manifest is supplied.
pub fn default_manifest() -> Manifest {
    let files = [
        "about.txt",
        "contact.txt",
        "blog/terminal-design.txt",
        "blog/user-experience.txt",
        "blog/web-development.txt",
    ];

    Manifest {
        files: files
            .iter()
            .map(|path| FileEntry::new(*path, format!("{}/{}", CONTENT_PREFIX, path)))
            .collect(),
        directories: vec![],
    }
}
