use serde::{Deserialize, Serialize};

// =============================================================================
// Manifest Types
// =============================================================================

/// Root manifest structure from `manifest.json`.
///
/// Entries are applied in declaration order, so the order of `files` decides
/// the listing order of every directory. Declared directories go in after
/// all files unless anchored with [`DirectoryEntry::before_file`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Manifest {
    /// File entries
    pub files: Vec<FileEntry>,
    /// Directories that must exist even when empty
    #[serde(default)]
    pub directories: Vec<DirectoryEntry>,
}

/// File entry from `manifest.json`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct FileEntry {
    /// Virtual path (e.g., `blog/post.txt`)
    pub path: String,
    /// Handle passed to the content loader
    pub content: String,
}

impl FileEntry {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// Directory entry from `manifest.json`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct DirectoryEntry {
    /// Virtual path (e.g., `blog/drafts`)
    pub path: String,
    /// Index into `files` this directory is created before, so it lists
    /// ahead of that file's siblings. `None` creates it after all files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before_file: Option<usize>,
}

impl DirectoryEntry {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            before_file: None,
        }
    }

    /// Create the directory ahead of `files[index]`.
    pub fn before_file(mut self, index: usize) -> Self {
        self.before_file = Some(index);
        self
    }
}

// =============================================================================
// Tree Types
// =============================================================================

/// A directory of the virtual filesystem.
///
/// Entries keep insertion order, which is the order `ls` prints them in.
/// Names are unique and compared case-sensitively.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Directory {
    entries: Vec<(String, FsNode)>,
}

impl Directory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exact, case-sensitive lookup.
    pub fn get(&self, name: &str) -> Option<&FsNode> {
        self.entries
            .iter()
            .find(|(entry, _)| entry == name)
            .map(|(_, node)| node)
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut FsNode> {
        self.entries
            .iter_mut()
            .find(|(entry, _)| entry == name)
            .map(|(_, node)| node)
    }

    /// Exact lookup that only succeeds for subdirectories.
    pub fn subdirectory(&self, name: &str) -> Option<&Directory> {
        match self.get(name)? {
            FsNode::Directory(dir) => Some(dir),
            FsNode::File { .. } => None,
        }
    }

    /// Iterate entries in listing order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &FsNode)> {
        self.entries.iter().map(|(name, node)| (name.as_str(), node))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append an entry. Returns `false` (and leaves the directory untouched)
    /// when the name is already taken.
    pub(crate) fn insert(&mut self, name: impl Into<String>, node: FsNode) -> bool {
        let name = name.into();
        if self.get(&name).is_some() {
            return false;
        }
        self.entries.push((name, node));
        true
    }
}

/// Represents an entry in the virtual filesystem.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FsNode {
    File {
        /// Opaque handle resolved by the content loader
        content_ref: String,
    },
    Directory(Directory),
}

impl FsNode {
    pub fn file(content_ref: impl Into<String>) -> Self {
        FsNode::File {
            content_ref: content_ref.into(),
        }
    }

    /// Check if this entry is a directory.
    pub fn is_directory(&self) -> bool {
        matches!(self, FsNode::Directory(_))
    }

    /// Content handle (files only).
    pub fn content_ref(&self) -> Option<&str> {
        match self {
            FsNode::File { content_ref } => Some(content_ref),
            FsNode::Directory(_) => None,
        }
    }

    /// Name as printed by `ls`: directories get a trailing `/`.
    pub fn display_name(&self, name: &str) -> String {
        if self.is_directory() {
            format!("{}/", name)
        } else {
            name.to_string()
        }
    }
}
