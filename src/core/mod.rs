//! Core business logic for the shell.
//!
//! This module provides:
//! - [`VirtualFs`] virtual filesystem and path resolution
//! - [`Command`] parsing and [`execute_command`] execution
//! - [`autocomplete`] for tab completion
//! - [`ContentLoader`] for streaming file content
//! - [`ShellSession`] tying it all together for one terminal

pub mod autocomplete;
pub mod commands;
pub mod error;
mod filesystem;
pub mod loader;
mod login;
mod shell;

pub use autocomplete::{AutocompleteResult, CompletionSet, complete};
pub use commands::{Command, CommandResult, ExecContext, Output, execute_command};
pub use filesystem::VirtualFs;
pub use loader::{
    ByteStream, ContentLoader, LineDecoder, LineStream, MemoryTransport, Transport,
    format_load_error,
};
pub use login::last_login_banner;
pub use shell::{Interrupter, RenderSink, ShellSession, ShellState};
