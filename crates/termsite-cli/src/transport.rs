//! Local directory transport.

use std::fs::File;
use std::io::{self, Read};
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use futures::StreamExt;
use futures::stream;
use log::debug;
use termsite::Transport;
use termsite::config::READ_CHUNK_SIZE;
use termsite::core::ByteStream;
use termsite::core::error::FetchError;

/// Serves content refs as files below a root directory.
///
/// Refs are relative paths. Anything that would leave the root (`..`,
/// absolute paths, drive prefixes) is reported as not found.
#[derive(Clone, Debug)]
pub struct DirTransport {
    root: PathBuf,
    chunk_size: usize,
}

impl DirTransport {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            chunk_size: READ_CHUNK_SIZE,
        }
    }

    pub fn with_chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size.max(1);
        self
    }

    fn locate(&self, resource: &str) -> Option<PathBuf> {
        let rel = Path::new(resource);
        let contained = rel
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        (contained && !resource.is_empty()).then(|| self.root.join(rel))
    }
}

fn read_error(err: io::Error) -> FetchError {
    match err.kind() {
        io::ErrorKind::NotFound => FetchError::NotFound,
        _ => FetchError::Transport(err.to_string()),
    }
}

#[async_trait(?Send)]
impl Transport for DirTransport {
    async fn fetch(&self, resource: &str) -> Result<ByteStream, FetchError> {
        let path = self.locate(resource).ok_or(FetchError::NotFound)?;
        if path.is_dir() {
            return Err(FetchError::NotFound);
        }
        let file = File::open(&path).map_err(read_error)?;
        debug!("serving {}", path.display());

        let chunk_size = self.chunk_size;
        let chunks = stream::unfold(Some(file), move |file| async move {
            let mut file = file?;
            let mut buf = vec![0; chunk_size];
            match file.read(&mut buf) {
                Ok(0) => None,
                Ok(n) => {
                    buf.truncate(n);
                    Some((Ok(buf), Some(file)))
                }
                Err(err) => Some((Err(FetchError::Transport(err.to_string())), None)),
            }
        });
        Ok(chunks.boxed_local())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use std::fs;
    use termsite::ContentLoader;

    fn lines(transport: DirTransport, resource: &str) -> Vec<String> {
        let loader = ContentLoader::new(transport);
        block_on(loader.stream(resource).collect())
    }

    #[test]
    fn test_streams_file_in_chunks() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("content")).unwrap();
        fs::write(dir.path().join("content/about.txt"), "one\ntwo\nthree").unwrap();

        let transport = DirTransport::new(dir.path()).with_chunk_size(2);
        assert_eq!(
            lines(transport, "content/about.txt"),
            vec!["one", "two", "three"]
        );
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            lines(DirTransport::new(dir.path()), "content/none.txt"),
            vec!["Error loading content/none.txt: 404 Not Found"]
        );
    }

    #[test]
    fn test_refuses_escape() {
        let dir = tempfile::tempdir().unwrap();
        let transport = DirTransport::new(dir.path().join("site"));
        assert_eq!(transport.locate("../secret.txt"), None);
        assert_eq!(transport.locate("/etc/passwd"), None);
        assert_eq!(transport.locate(""), None);
        assert!(transport.locate("content/./a.txt").is_some());
    }

    #[test]
    fn test_directory_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("content")).unwrap();
        let result = block_on(DirTransport::new(dir.path()).fetch("content"));
        assert!(matches!(result, Err(FetchError::NotFound)));
    }
}
