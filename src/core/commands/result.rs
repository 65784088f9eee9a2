//! Command execution result type.

use std::fmt;

use futures::FutureExt;
use futures::future::LocalBoxFuture;

use crate::core::loader::LineStream;

/// A finished piece of output with its rendering flag.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Output {
    pub text: String,
    /// Render as rich text instead of escaped plain text
    pub rich: bool,
}

impl Output {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            rich: false,
        }
    }
}

/// Result of executing a command.
///
/// Every handler picks one shape explicitly; the dispatcher matches on it
/// to deliver output in arrival order.
pub enum CommandResult {
    /// Nothing to show
    Empty,
    /// Output available immediately
    Value(Output),
    /// Output that resolves later as a single block
    Pending(LocalBoxFuture<'static, Output>),
    /// Lines produced on demand, each delivered as it arrives
    Stream { lines: LineStream, rich: bool },
    /// Ask the renderer to clear all output
    Clear,
}

impl CommandResult {
    /// Create a plain-text result. Empty text delivers nothing.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Value(Output::text(text))
    }

    pub fn empty() -> Self {
        Self::Empty
    }

    pub fn pending(future: impl Future<Output = Output> + 'static) -> Self {
        Self::Pending(future.boxed_local())
    }

    pub fn stream(lines: LineStream, rich: bool) -> Self {
        Self::Stream { lines, rich }
    }
}

impl fmt::Debug for CommandResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "Empty"),
            Self::Value(output) => f.debug_tuple("Value").field(output).finish(),
            Self::Pending(_) => write!(f, "Pending(..)"),
            Self::Stream { rich, .. } => f.debug_struct("Stream").field("rich", rich).finish(),
            Self::Clear => write!(f, "Clear"),
        }
    }
}
