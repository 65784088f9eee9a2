//! Tab autocomplete for command names and paths.
//!
//! Names match case-insensitively here even though `cd` and `cat` require
//! exact names when executed.
//!
//! The autocomplete system supports:
//! - Single match: replace the input with it
//! - Multiple matches: list them and advance to their common prefix

use crate::config::{PATH_COMMANDS, VISIBLE_COMMANDS};
use crate::core::VirtualFs;
use crate::models::{Directory, NavigationState};

// ============================================================================
// Public Types
// ============================================================================

/// Candidates for one completion request.
///
/// Each candidate is a full replacement for the input line: the leading
/// whitespace and the tokens before the one being completed are already
/// spliced back in.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CompletionSet {
    pub candidates: Vec<String>,
    pub leading_whitespace: String,
    pub fixed_prefix_tokens: Vec<String>,
}

/// What the input line should do with a [`CompletionSet`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AutocompleteResult {
    /// Single match - replace the input with this value.
    Single(String),
    /// Multiple matches - (common_prefix, all_matches). An empty prefix
    /// means the input stays as it is.
    Multiple(String, Vec<String>),
    /// No matches found.
    None,
}

impl CompletionSet {
    fn push(&mut self, candidate: String) {
        if !self.candidates.contains(&candidate) {
            self.candidates.push(candidate);
        }
    }

    /// Apply the single/multiple policy.
    pub fn resolve(&self) -> AutocompleteResult {
        match self.candidates.len() {
            0 => AutocompleteResult::None,
            1 => AutocompleteResult::Single(self.candidates[0].clone()),
            _ => AutocompleteResult::Multiple(
                find_common_prefix(&self.candidates),
                self.candidates.clone(),
            ),
        }
    }
}

// ============================================================================
// Public API
// ============================================================================

/// Compute completion candidates for a partially typed line.
pub fn complete(input: &str, nav: &NavigationState, fs: &VirtualFs) -> CompletionSet {
    let trimmed = input.trim_start();
    let mut set = CompletionSet {
        leading_whitespace: input[..input.len() - trimmed.len()].to_string(),
        ..Default::default()
    };

    let parts: Vec<&str> = trimmed.split(' ').collect();
    let Some((last, fixed)) = parts.split_last() else {
        return set;
    };

    if fixed.is_empty() {
        complete_command(&mut set, last);
        return set;
    }

    let command = fixed[0].to_lowercase();
    if !PATH_COMMANDS.contains(&command.as_str()) {
        return set;
    }

    set.fixed_prefix_tokens = fixed.iter().map(|s| s.to_string()).collect();
    if let Ok(cwd) = fs.cwd(nav) {
        complete_path(&mut set, cwd, last);
    }
    set
}

// ============================================================================
// Command Completion
// ============================================================================

fn complete_command(set: &mut CompletionSet, partial: &str) {
    let partial_lower = partial.to_lowercase();
    for cmd in VISIBLE_COMMANDS {
        if cmd.to_lowercase().starts_with(&partial_lower) {
            let candidate = format!("{}{}", set.leading_whitespace, cmd);
            set.push(candidate);
        }
    }
}

// ============================================================================
// Path Completion
// ============================================================================

/// Complete the last token as a path relative to `cwd`.
fn complete_path(set: &mut CompletionSet, cwd: &Directory, partial: &str) {
    let (dir_part, name_part) = match partial.rsplit_once('/') {
        Some((dir, name)) => (Some(dir), name),
        None => (None, partial),
    };

    let mut current = cwd;
    if let Some(dir) = dir_part {
        for segment in dir.split('/').filter(|s| !s.is_empty()) {
            match find_directory_ignore_case(current, segment) {
                Some(next) => current = next,
                None => return,
            }
        }
    }

    let line_prefix = format!(
        "{}{} {}",
        set.leading_whitespace,
        set.fixed_prefix_tokens.join(" "),
        dir_part.map(|d| format!("{}/", d)).unwrap_or_default()
    );

    let name_lower = name_part.to_lowercase();
    let matches: Vec<String> = current
        .entries()
        .filter(|(name, _)| name.to_lowercase().starts_with(&name_lower))
        .map(|(name, _)| format!("{}{}", line_prefix, name))
        .collect();

    for candidate in matches {
        set.push(candidate);
    }
}

/// The one subdirectory whose name matches `segment` ignoring case.
///
/// Ambiguous segments (two directories differing only in case) match nothing.
fn find_directory_ignore_case<'a>(dir: &'a Directory, segment: &str) -> Option<&'a Directory> {
    let segment_lower = segment.to_lowercase();
    let mut found = dir
        .entries()
        .filter(|(name, node)| node.is_directory() && name.to_lowercase() == segment_lower)
        .filter_map(|(name, _)| dir.subdirectory(name));

    let first = found.next()?;
    match found.next() {
        Some(_) => None,
        None => Some(first),
    }
}

// ============================================================================
// Utilities
// ============================================================================

/// Longest common prefix of the candidates, compared case-insensitively.
///
/// Shortens the first string one character at a time until every other
/// string starts with it. Returns an empty string when nothing is shared.
pub fn find_common_prefix(strings: &[String]) -> String {
    let Some((first, rest)) = strings.split_first() else {
        return String::new();
    };

    let mut prefix = first.clone();
    for s in rest {
        let s_lower = s.to_lowercase();
        while !s_lower.starts_with(&prefix.to_lowercase()) {
            prefix.pop();
            if prefix.is_empty() {
                return String::new();
            }
        }
    }
    prefix
}

// ============================================================================
// Tests
// ============================================================================
