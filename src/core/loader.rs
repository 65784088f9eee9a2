//! Streaming content loader.
//!
//! Fetches a file's backing resource through a [`Transport`] and exposes it as
//! a lazy sequence of lines. Lines are produced as bytes arrive, so large
//! files render progressively instead of after the full download.

use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use async_trait::async_trait;
use futures::stream::{self, LocalBoxStream};
use futures::{StreamExt, future};
use log::{debug, warn};

use crate::core::error::FetchError;

/// Raw body of a fetched resource.
pub type ByteStream = LocalBoxStream<'static, Result<Vec<u8>, FetchError>>;

/// Lazy, single-use sequence of output lines.
pub type LineStream = LocalBoxStream<'static, String>;

/// Byte-fetching seam. Implementations live with the host: the browser build
/// uses the Fetch API, the CLI reads a content directory, tests use
/// [`MemoryTransport`].
#[async_trait(?Send)]
pub trait Transport {
    /// Open `resource` and return its body as a stream of byte chunks.
    async fn fetch(&self, resource: &str) -> Result<ByteStream, FetchError>;
}

// =============================================================================
// Line Decoding
// =============================================================================

/// Incremental line splitter.
///
/// Splits on `\n` at the byte level and decodes each complete line on its
/// own, so multi-byte characters cut across chunk boundaries come out intact.
/// Invalid UTF-8 is replaced with U+FFFD.
#[derive(Debug, Default)]
pub struct LineDecoder {
    buffer: Vec<u8>,
    /// Prefix of `buffer` already known to hold no `\n`.
    scanned: usize,
}

impl LineDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk and return every line it completes.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(bytes);

        let mut lines = Vec::new();
        let mut start = 0;
        let mut from = self.scanned;
        while let Some(pos) = self.buffer[from..].iter().position(|b| *b == b'\n') {
            let end = from + pos;
            lines.push(String::from_utf8_lossy(&self.buffer[start..end]).into_owned());
            start = end + 1;
            from = start;
        }

        if start > 0 {
            self.buffer.drain(..start);
        }
        self.scanned = self.buffer.len();
        lines
    }

    /// Flush the trailing partial line at end of stream.
    pub fn finish(&mut self) -> Option<String> {
        if self.buffer.is_empty() {
            return None;
        }
        self.scanned = 0;
        let rest = std::mem::take(&mut self.buffer);
        Some(String::from_utf8_lossy(&rest).into_owned())
    }
}

// =============================================================================
// Content Loader
// =============================================================================

enum LoadState {
    Connecting {
        transport: Rc<dyn Transport>,
        resource: String,
    },
    Reading {
        body: ByteStream,
        decoder: LineDecoder,
        ready: VecDeque<String>,
    },
    Done,
}

/// Loads content refs through a shared transport.
#[derive(Clone)]
pub struct ContentLoader {
    transport: Rc<dyn Transport>,
}

impl ContentLoader {
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self {
            transport: Rc::new(transport),
        }
    }

    /// Lines of `resource`, with failures as items.
    ///
    /// The sequence ends right after the first `Err`. Nothing is fetched
    /// until the first pull.
    pub fn lines(&self, resource: &str) -> LocalBoxStream<'static, Result<String, FetchError>> {
        let state = LoadState::Connecting {
            transport: Rc::clone(&self.transport),
            resource: resource.to_string(),
        };

        stream::unfold(state, |mut state| async move {
            loop {
                match state {
                    LoadState::Connecting {
                        transport,
                        resource,
                    } => match transport.fetch(&resource).await {
                        Ok(body) => {
                            debug!("streaming {}", resource);
                            state = LoadState::Reading {
                                body,
                                decoder: LineDecoder::new(),
                                ready: VecDeque::new(),
                            };
                        }
                        Err(err) => return Some((Err(err), LoadState::Done)),
                    },
                    LoadState::Reading {
                        mut body,
                        mut decoder,
                        mut ready,
                    } => {
                        if let Some(line) = ready.pop_front() {
                            let next = LoadState::Reading {
                                body,
                                decoder,
                                ready,
                            };
                            return Some((Ok(line), next));
                        }

                        match body.next().await {
                            Some(Ok(bytes)) => {
                                ready.extend(decoder.feed(&bytes));
                                state = LoadState::Reading {
                                    body,
                                    decoder,
                                    ready,
                                };
                            }
                            Some(Err(err)) => return Some((Err(err), LoadState::Done)),
                            None => return decoder.finish().map(|line| (Ok(line), LoadState::Done)),
                        }
                    }
                    LoadState::Done => return None,
                }
            }
        })
        .boxed_local()
    }

    /// Lines of `resource` for display.
    ///
    /// A failed fetch or a broken body yields exactly one formatted error line
    /// and ends the sequence; no error reaches the caller.
    pub fn stream(&self, resource: &str) -> LineStream {
        let name = resource.to_string();
        self.lines(resource)
            .map(move |item| match item {
                Ok(line) => line,
                Err(err) => {
                    warn!("failed to load {}: {}", name, err);
                    format_load_error(&name, &err)
                }
            })
            .boxed_local()
    }

    /// Collect the whole document, failing on the first error.
    pub async fn read_to_string(&self, resource: &str) -> Result<String, FetchError> {
        let lines: Vec<String> = self
            .lines(resource)
            .collect::<Vec<_>>()
            .await
            .into_iter()
            .collect::<Result<_, _>>()?;
        Ok(lines.join("\n"))
    }
}

/// Inline message for a failed load.
pub fn format_load_error(resource: &str, err: &FetchError) -> String {
    if err.is_status() {
        format!("Error loading {}: {}", resource, err)
    } else {
        format!("Error loading {} content: {}", resource, err)
    }
}

// =============================================================================
// In-memory Transport
// =============================================================================

#[derive(Clone, Debug)]
enum MemoryResource {
    Body(Vec<u8>),
    Status(u16, String),
    /// Sends the bytes, then fails with the message.
    Broken(Vec<u8>, String),
    /// Sends the bytes, then never completes.
    Stalled(Vec<u8>),
}

/// Transport over resources held in memory.
///
/// Useful for embedding a site in the binary and for exercising the loader:
/// bodies can be split into small chunks, fail midway, or stall.
#[derive(Clone, Debug, Default)]
pub struct MemoryTransport {
    resources: HashMap<String, MemoryResource>,
    chunk_size: Option<usize>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, resource: &str, body: impl Into<Vec<u8>>) -> Self {
        self.resources
            .insert(resource.to_string(), MemoryResource::Body(body.into()));
        self
    }

    pub fn with_status(mut self, resource: &str, status: u16, reason: &str) -> Self {
        self.resources.insert(
            resource.to_string(),
            MemoryResource::Status(status, reason.to_string()),
        );
        self
    }

    pub fn with_broken(mut self, resource: &str, prefix: impl Into<Vec<u8>>, message: &str) -> Self {
        self.resources.insert(
            resource.to_string(),
            MemoryResource::Broken(prefix.into(), message.to_string()),
        );
        self
    }

    pub fn with_stalled(mut self, resource: &str, prefix: impl Into<Vec<u8>>) -> Self {
        self.resources
            .insert(resource.to_string(), MemoryResource::Stalled(prefix.into()));
        self
    }

    /// Deliver bodies in chunks of at most `size` bytes.
    pub fn with_chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = Some(size.max(1));
        self
    }

    fn chunks(&self, bytes: &[u8]) -> Vec<Result<Vec<u8>, FetchError>> {
        let size = self.chunk_size.unwrap_or(bytes.len().max(1));
        bytes.chunks(size).map(|c| Ok(c.to_vec())).collect()
    }
}

#[async_trait(?Send)]
impl Transport for MemoryTransport {
    async fn fetch(&self, resource: &str) -> Result<ByteStream, FetchError> {
        match self.resources.get(resource) {
            None => Err(FetchError::NotFound),
            Some(MemoryResource::Status(status, reason)) => Err(FetchError::HttpError {
                status: *status,
                reason: reason.clone(),
            }),
            Some(MemoryResource::Body(bytes)) => Ok(stream::iter(self.chunks(bytes)).boxed_local()),
            Some(MemoryResource::Broken(prefix, message)) => {
                let failure = stream::once(future::ready(Err(FetchError::Transport(
                    message.clone(),
                ))));
                Ok(stream::iter(self.chunks(prefix))
                    .chain(failure)
                    .boxed_local())
            }
            Some(MemoryResource::Stalled(prefix)) => Ok(stream::iter(self.chunks(prefix))
                .chain(stream::pending())
                .boxed_local()),
        }
    }
}
