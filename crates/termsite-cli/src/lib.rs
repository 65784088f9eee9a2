//! Native host for the termsite shell.
//!
//! - [`manifest`] - Generate a filesystem manifest from a content directory
//! - [`transport`] - Serve content refs from disk
//! - [`store`] - Persist the last-login time in a JSON file
//! - [`repl`] - Line-mode terminal

pub mod manifest;
pub mod repl;
pub mod store;
pub mod transport;

pub use repl::TerminalSink;
pub use store::FileStore;
pub use transport::DirTransport;
