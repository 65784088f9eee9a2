//! Terminal-style personal site engine.
//!
//! A read-only virtual filesystem browsed through a tiny shell (`ls`, `cd`,
//! `cat`, `help`, `clear`) with tab completion and streamed file content.
//! Hosts supply a byte [`Transport`], a [`RenderSink`] and a
//! [`KeyValueStore`]; everything else lives here.
//!
//! ```no_run
//! use std::rc::Rc;
//! use termsite::{ContentLoader, MemoryTransport, ShellConfig, ShellSession, VirtualFs};
//!
//! let fs = VirtualFs::from_manifest(&termsite::config::default_manifest())?;
//! let loader = ContentLoader::new(MemoryTransport::new());
//! let session = ShellSession::new(Rc::new(fs), loader, ShellConfig::default());
//! assert_eq!(session.prompt(), "/");
//! # Ok::<(), termsite::core::error::ManifestError>(())
//! ```

pub mod config;
pub mod core;
pub mod models;
pub mod utils;

pub use crate::config::ShellConfig;
pub use crate::core::{
    AutocompleteResult, Command, CommandResult, ContentLoader, Interrupter, MemoryTransport,
    RenderSink, ShellSession, ShellState, Transport, VirtualFs,
};
pub use crate::models::{Manifest, NavigationState, OutputBlock, OutputData};
pub use crate::utils::{KeyValueStore, MemoryStore};
