use std::collections::BTreeMap;

use log::debug;

use crate::core::error::{FsError, ManifestError};
use crate::models::{Directory, DirectoryEntry, FsNode, Manifest, NavigationState};

/// Virtual, read-only filesystem.
///
/// Built once from a [`Manifest`] and never mutated afterwards; sessions
/// share it behind an `Rc`.
///
/// # Path Convention
///
/// - Paths are relative to the session cursor
/// - Segments are separated by `/`; empty segments are ignored
/// - Lookups are exact and case-sensitive
#[derive(Clone, Debug, Default)]
pub struct VirtualFs {
    root: Directory,
}

impl VirtualFs {
    /// Create filesystem from manifest.
    ///
    /// Files are inserted in declaration order, creating parent directories
    /// on the way. A declared directory with `before_file` is created just
    /// ahead of that file; the rest are created after all files, so empty
    /// directories exist too.
    pub fn from_manifest(manifest: &Manifest) -> Result<Self, ManifestError> {
        let mut root = Directory::new();

        let mut anchored: BTreeMap<usize, Vec<&DirectoryEntry>> = BTreeMap::new();
        let mut trailing = Vec::new();
        for dir in &manifest.directories {
            match dir.before_file {
                Some(index) if index < manifest.files.len() => {
                    anchored.entry(index).or_default().push(dir)
                }
                _ => trailing.push(dir),
            }
        }

        for (index, file) in manifest.files.iter().enumerate() {
            for dir in anchored.remove(&index).unwrap_or_default() {
                Self::create_declared(&mut root, dir)?;
            }

            let (parents, name) = split_manifest_path(&file.path)?;
            let parent = Self::ensure_directory(&mut root, &file.path, &parents)?;
            if !parent.insert(name, FsNode::file(&file.content)) {
                return Err(ManifestError::Duplicate(file.path.clone()));
            }
        }

        for dir in trailing {
            Self::create_declared(&mut root, dir)?;
        }

        Ok(Self { root })
    }

    fn create_declared(root: &mut Directory, dir: &DirectoryEntry) -> Result<(), ManifestError> {
        if dir.path.is_empty() {
            return Ok(());
        }
        let (mut parents, name) = split_manifest_path(&dir.path)?;
        parents.push(name);
        Self::ensure_directory(root, &dir.path, &parents)?;
        Ok(())
    }

    /// Parse a manifest JSON document and build the tree.
    pub fn from_json(json: &str) -> Result<Self, ManifestError> {
        let manifest: Manifest = serde_json::from_str(json)?;
        Self::from_manifest(&manifest)
    }

    /// Walk `segments` from root, creating missing directories.
    fn ensure_directory<'a>(
        root: &'a mut Directory,
        path: &str,
        segments: &[&str],
    ) -> Result<&'a mut Directory, ManifestError> {
        let mut current = root;

        for (i, segment) in segments.iter().enumerate() {
            if current.get(segment).is_none() {
                current.insert(*segment, FsNode::Directory(Directory::new()));
            }

            current = match current.get_mut(segment) {
                Some(FsNode::Directory(dir)) => dir,
                _ => {
                    return Err(ManifestError::BlockedByFile {
                        path: path.to_string(),
                        blocker: segments[..=i].join("/"),
                    });
                }
            };
        }

        Ok(current)
    }

    pub fn root(&self) -> &Directory {
        &self.root
    }

    /// Directory named by the session cursor.
    pub fn cwd(&self, nav: &NavigationState) -> Result<&Directory, FsError> {
        let mut current = &self.root;
        for segment in nav.segments() {
            current = current
                .subdirectory(segment)
                .ok_or_else(|| FsError::CursorInvalid(nav.display_path()))?;
        }
        Ok(current)
    }

    /// Resolve a directory path against the cursor.
    ///
    /// An empty path names the cursor itself. Resolution stops at the first
    /// segment that is missing or names a file, and the error carries the
    /// path as requested. There is no `..` handling here.
    pub fn resolve_directory<'a>(
        &'a self,
        path: &str,
        nav: &NavigationState,
    ) -> Result<&'a Directory, FsError> {
        let mut current = self.cwd(nav)?;

        for segment in path.split('/').filter(|s| !s.is_empty()) {
            current = current.subdirectory(segment).ok_or_else(|| {
                debug!("resolve '{}' failed at segment '{}'", path, segment);
                FsError::NoSuchDirectory(path.to_string())
            })?;
        }

        Ok(current)
    }

    /// Resolve a path whose last segment names an entry of either kind.
    ///
    /// Returns `Ok(None)` when the parent resolves but the final name does
    /// not exist.
    pub fn resolve_entry<'a>(
        &'a self,
        path: &str,
        nav: &NavigationState,
    ) -> Result<Option<&'a FsNode>, FsError> {
        let (parent, name) = match path.rsplit_once('/') {
            Some((parent, name)) => (parent, name),
            None => ("", path),
        };
        let dir = self.resolve_directory(parent, nav)?;
        Ok(dir.get(name))
    }
}

/// Split a manifest path into parent segments and the final name.
fn split_manifest_path(path: &str) -> Result<(Vec<&str>, &str), ManifestError> {
    let mut segments: Vec<&str> = path.split('/').collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err(ManifestError::EmptySegment(path.to_string()));
    }
    // split() always yields at least one item
    let name = segments.pop().unwrap_or_default();
    Ok((segments, name))
}
