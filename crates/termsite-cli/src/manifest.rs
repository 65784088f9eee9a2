//! Manifest generation from a content directory.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::debug;
use termsite::Manifest;
use termsite::models::{DirectoryEntry, FileEntry};

/// Scan `root` and describe it as a manifest.
///
/// Entries are visited in sorted name order and names starting with `.` are
/// skipped. Each file's content ref is `<prefix>/<relative path>`. Empty
/// directories are listed so they survive the round trip, anchored before
/// the next file in walk order so they keep their sorted position.
pub fn scan(root: &Path, prefix: &str) -> Result<Manifest> {
    let mut manifest = Manifest::default();
    walk(root, "", prefix, &mut manifest)?;
    Ok(manifest)
}

fn walk(dir: &Path, rel: &str, prefix: &str, manifest: &mut Manifest) -> Result<()> {
    let mut entries = fs::read_dir(dir)
        .with_context(|| format!("failed to read directory {}", dir.display()))?
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("failed to list {}", dir.display()))?;
    entries.sort_by_key(|entry| entry.file_name());

    let mut has_children = false;
    for entry in entries {
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }
        has_children = true;

        let path = if rel.is_empty() {
            name
        } else {
            format!("{}/{}", rel, name)
        };
        let file_type = entry
            .file_type()
            .with_context(|| format!("failed to stat {}", entry.path().display()))?;

        if file_type.is_dir() {
            walk(&entry.path(), &path, prefix, manifest)?;
        } else {
            debug!("manifest file {}", path);
            let content = if prefix.is_empty() {
                path.clone()
            } else {
                format!("{}/{}", prefix.trim_end_matches('/'), path)
            };
            manifest.files.push(FileEntry::new(path, content));
        }
    }

    if !has_children && !rel.is_empty() {
        let next_file = manifest.files.len();
        manifest
            .directories
            .push(DirectoryEntry::new(rel).before_file(next_file));
    }
    Ok(())
}

/// Write `manifest` as pretty JSON.
pub fn write(manifest: &Manifest, out: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(manifest).context("failed to encode manifest")?;
    fs::write(out, json + "\n").with_context(|| format!("failed to write {}", out.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use termsite::VirtualFs;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, rel).unwrap();
    }

    #[test]
    fn test_scan_sorted_and_hidden_skipped() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "contact.txt");
        touch(dir.path(), "about.txt");
        touch(dir.path(), ".DS_Store");
        touch(dir.path(), "blog/web.txt");
        touch(dir.path(), ".git/config");
        fs::create_dir(dir.path().join("drafts")).unwrap();

        let manifest = scan(dir.path(), "content").unwrap();
        let paths: Vec<&str> = manifest.files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["about.txt", "blog/web.txt", "contact.txt"]);
        assert_eq!(manifest.files[1].content, "content/blog/web.txt");
        assert_eq!(manifest.directories.len(), 1);
        assert_eq!(manifest.directories[0].path, "drafts");
        assert_eq!(manifest.directories[0].before_file, Some(3));
    }

    #[test]
    fn test_empty_directory_keeps_sorted_position() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("archive")).unwrap();
        touch(dir.path(), "zeta.txt");
        touch(dir.path(), "blog/post.txt");
        fs::create_dir(dir.path().join("blog/drafts")).unwrap();

        let manifest = scan(dir.path(), "content").unwrap();
        let fs = VirtualFs::from_manifest(&manifest).unwrap();
        let root: Vec<String> = fs
            .root()
            .entries()
            .map(|(name, node)| node.display_name(name))
            .collect();
        assert_eq!(root, vec!["archive/", "blog/", "zeta.txt"]);

        let blog: Vec<String> = fs
            .root()
            .subdirectory("blog")
            .unwrap()
            .entries()
            .map(|(name, node)| node.display_name(name))
            .collect();
        assert_eq!(blog, vec!["drafts/", "post.txt"]);
    }

    #[test]
    fn test_scanned_manifest_loads() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "about.txt");
        touch(dir.path(), "blog/a.txt");

        let manifest = scan(dir.path(), "").unwrap();
        assert_eq!(manifest.files[1].content, "blog/a.txt");
        let fs = VirtualFs::from_manifest(&manifest).unwrap();
        assert!(fs.root().subdirectory("blog").is_some());
    }

    #[test]
    fn test_write_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "about.txt");
        let manifest = scan(dir.path(), "content").unwrap();

        let out = dir.path().join("manifest.json");
        write(&manifest, &out).unwrap();
        let json = fs::read_to_string(&out).unwrap();
        assert!(VirtualFs::from_json(&json).is_ok());
    }

    #[test]
    fn test_scan_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(scan(&dir.path().join("nope"), "content").is_err());
    }
}
