//! Command parsing and execution.
//!
//! This module provides:
//! - `Command` enum for parsed shell commands
//! - `CommandResult` for command execution results
//! - `execute_command` for running a command against a session's state
//!
//! # Architecture
//!
//! A submitted line is split into a command name and an argument string,
//! parsed into the `Command` enum, then executed via `execute_command`.

mod execute;
mod result;

pub use execute::{ExecContext, execute_command};
pub use result::{CommandResult, Output};

use std::fmt;

use crate::config::VISIBLE_COMMANDS;

// =============================================================================
// Path Argument Type
// =============================================================================

/// A path argument passed to a command (e.g., `cd blog`, `cat about.txt`).
///
/// Stored exactly as typed; validation happens during execution against the
/// virtual filesystem, and error messages echo this original text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathArg(String);

impl PathArg {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// `None` for an empty argument string.
    pub fn optional(arg: &str) -> Option<Self> {
        if arg.is_empty() {
            None
        } else {
            Some(Self::new(arg))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PathArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl PartialEq<&str> for PathArg {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

// =============================================================================
// Command Enum
// =============================================================================

/// Parsed shell command
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// List a directory (default: current)
    Ls(Option<PathArg>),
    Cd(Option<PathArg>),
    Cat(Option<PathArg>),
    Help,
    Clear,
    /// Print the working directory (not offered by completion)
    Pwd,
    Unknown(String),
}

impl Command {
    /// Every dispatchable command name, including the hidden ones.
    pub fn names() -> &'static [&'static str] {
        &["ls", "cd", "cat", "help", "clear", "cls", "pwd"]
    }

    /// Names offered by tab completion.
    pub fn visible_names() -> &'static [&'static str] {
        VISIBLE_COMMANDS
    }

    /// Split a submitted line into a command name and its argument string.
    ///
    /// The line is trimmed, then split at the first space; the remainder is
    /// kept verbatim.
    pub fn split_line(line: &str) -> (&str, &str) {
        let line = line.trim();
        line.split_once(' ').unwrap_or((line, ""))
    }

    /// Parse command from name and argument string (name is case-insensitive).
    pub fn parse(name: &str, args: &str) -> Self {
        let name = name.to_lowercase();
        match name.as_str() {
            "ls" => Self::Ls(PathArg::optional(args)),
            "cd" => Self::Cd(PathArg::optional(args)),
            "cat" => Self::Cat(PathArg::optional(args)),
            "help" => Self::Help,
            "clear" | "cls" => Self::Clear,
            "pwd" => Self::Pwd,
            _ => Self::Unknown(name),
        }
    }

    /// Parse a full input line.
    pub fn parse_line(line: &str) -> Self {
        let (name, args) = Self::split_line(line);
        Self::parse(name, args)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_line() {
        assert_eq!(Command::split_line("  ls blog  "), ("ls", "blog"));
        assert_eq!(Command::split_line("help"), ("help", ""));
        assert_eq!(Command::split_line("cat my file.txt"), ("cat", "my file.txt"));
        assert_eq!(Command::split_line("cd  blog"), ("cd", " blog"));
        assert_eq!(Command::split_line(""), ("", ""));
    }

    #[test]
    fn test_parse_paths() {
        assert_eq!(Command::parse("ls", ""), Command::Ls(None));
        assert!(matches!(
            Command::parse("ls", "blog"),
            Command::Ls(Some(ref p)) if p == &"blog"
        ));
        assert_eq!(Command::parse("cd", ""), Command::Cd(None));
        assert!(matches!(
            Command::parse("cat", "about.txt"),
            Command::Cat(Some(ref p)) if p == &"about.txt"
        ));
    }

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!(Command::parse("LS", ""), Command::Ls(None));
        assert_eq!(Command::parse("HeLp", ""), Command::Help);
        assert_eq!(Command::parse("CLEAR", ""), Command::Clear);
    }

    #[test]
    fn test_parse_hidden() {
        assert_eq!(Command::parse("cls", ""), Command::Clear);
        assert_eq!(Command::parse("pwd", ""), Command::Pwd);
        assert!(!Command::visible_names().contains(&"pwd"));
        assert!(Command::names().contains(&"pwd"));
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(
            Command::parse_line("FooBar baz"),
            Command::Unknown("foobar".to_string())
        );
        assert_eq!(Command::parse_line("   "), Command::Unknown(String::new()));
    }

    #[test]
    fn test_visible_names_are_dispatchable() {
        for name in Command::visible_names() {
            assert!(Command::names().contains(name));
        }
    }
}
