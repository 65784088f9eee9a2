//! Command execution logic.
//!
//! Contains the `execute_command` function that runs parsed commands against
//! the virtual filesystem and returns results.

use log::warn;

use crate::config::{HELP_FALLBACK, ShellConfig};
use crate::core::error::{FsError, ShellError};
use crate::core::{ContentLoader, VirtualFs};
use crate::models::{FsNode, NavigationState};

use super::{Command, CommandResult, Output, PathArg};

/// Read-only collaborators shared by every command of a session.
#[derive(Clone, Copy)]
pub struct ExecContext<'a> {
    pub fs: &'a VirtualFs,
    pub loader: &'a ContentLoader,
    pub config: &'a ShellConfig,
}

/// Execute a parsed command.
///
/// Only `cd` mutates `nav`, and only after its target has been validated.
/// Every `Err` is a message for the user, never a fatal condition.
pub fn execute_command(
    cmd: Command,
    nav: &mut NavigationState,
    ctx: ExecContext<'_>,
) -> Result<CommandResult, ShellError> {
    match cmd {
        Command::Ls(path) => execute_ls(path, nav, ctx.fs),
        Command::Cd(path) => execute_cd(path, nav, ctx.fs),
        Command::Cat(path) => execute_cat(path, nav, ctx),
        Command::Help => Ok(execute_help(ctx)),
        Command::Clear => Ok(CommandResult::Clear),
        Command::Pwd => Ok(CommandResult::text(nav.display_path())),
        Command::Unknown(name) => Err(ShellError::UnknownCommand(name)),
    }
}

/// Execute `ls` command.
fn execute_ls(
    path: Option<PathArg>,
    nav: &NavigationState,
    fs: &VirtualFs,
) -> Result<CommandResult, ShellError> {
    let target = path.as_ref().map(PathArg::as_str).unwrap_or("");
    let dir = fs
        .resolve_directory(target, nav)
        .map_err(|e| e.for_command("ls"))?;

    let listing: Vec<String> = dir
        .entries()
        .map(|(name, node)| node.display_name(name))
        .collect();
    Ok(CommandResult::text(listing.join("\n")))
}

/// Execute `cd` command.
fn execute_cd(
    path: Option<PathArg>,
    nav: &mut NavigationState,
    fs: &VirtualFs,
) -> Result<CommandResult, ShellError> {
    let Some(path) = path else {
        return Err(ShellError::Usage("cd <directory>"));
    };

    if path == ".." {
        return Ok(if nav.pop() {
            CommandResult::empty()
        } else {
            CommandResult::text("Already at root directory")
        });
    }

    let cwd = fs.cwd(nav).map_err(|e| e.for_command("cd"))?;
    if cwd.subdirectory(path.as_str()).is_none() {
        return Err(ShellError::NoSuchDirectory {
            command: "cd",
            path: path.to_string(),
        });
    }

    nav.push(path.as_str());
    Ok(CommandResult::empty())
}

/// Execute `cat` command.
fn execute_cat(
    path: Option<PathArg>,
    nav: &NavigationState,
    ctx: ExecContext<'_>,
) -> Result<CommandResult, ShellError> {
    let Some(path) = path else {
        return Err(ShellError::Usage("cat <filename>"));
    };

    let no_such_file = || ShellError::NoSuchFile {
        command: "cat",
        path: path.to_string(),
    };

    match ctx.fs.resolve_entry(path.as_str(), nav) {
        Ok(Some(FsNode::File { content_ref })) => {
            let rich = ctx.config.is_rich_text(content_ref);
            Ok(CommandResult::stream(ctx.loader.stream(content_ref), rich))
        }
        Ok(Some(FsNode::Directory(_))) => Err(ShellError::IsADirectory {
            command: "cat",
            path: path.to_string(),
        }),
        Ok(None) | Err(FsError::NoSuchDirectory(_)) => Err(no_such_file()),
        Err(err) => Err(err.for_command("cat")),
    }
}

/// Execute `help` command.
///
/// Resolves to the whole help document as one block, or to a fixed fallback
/// when it cannot be loaded.
fn execute_help(ctx: ExecContext<'_>) -> CommandResult {
    let loader = ctx.loader.clone();
    let help_file = ctx.config.help_file.clone();

    CommandResult::pending(async move {
        match loader.read_to_string(&help_file).await {
            Ok(text) => Output::text(text),
            Err(err) => {
                warn!("help unavailable: {}", err);
                Output::text(HELP_FALLBACK)
            }
        }
    })
}
