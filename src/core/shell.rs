//! Shell dispatcher.
//!
//! A [`ShellSession`] owns the navigation cursor of one terminal and runs
//! submitted lines against a shared, immutable [`VirtualFs`]. Output goes to
//! a host-provided [`RenderSink`] in arrival order.
//!
//! # Lifecycle
//!
//! ```text
//! start ──► Idle ──submit──► Executing ──drained/interrupted──► Idle
//! ```
//!
//! `submit` borrows the session mutably until the command's output has been
//! fully delivered, so a second submission cannot start while one is running.

use std::fmt::Display;
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeZone};
use futures::StreamExt;
use futures::future::{AbortHandle, AbortRegistration, Abortable};
use log::debug;

use crate::config::{COMPLETION_SEPARATOR, ShellConfig};
use crate::core::autocomplete::{self, AutocompleteResult, CompletionSet};
use crate::core::commands::{Command, CommandResult, ExecContext, Output, execute_command};
use crate::core::login::last_login_banner;
use crate::core::{ContentLoader, VirtualFs};
use crate::models::{NavigationState, OutputBlock};
use crate::utils::{KeyValueStore, format_candidates};

// ============================================================================
// Host Seams
// ============================================================================

/// Where a session's output goes.
pub trait RenderSink {
    /// Display one output block.
    fn render(&mut self, block: OutputBlock);

    /// Remove all output shown so far.
    fn clear(&mut self);

    /// The prompt changed, or the shell is ready for input again.
    fn prompt_changed(&mut self, _prompt: &str) {}
}

/// Whether a session is waiting for input.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ShellState {
    #[default]
    Idle,
    Executing,
}

/// Stops the output of the command currently executing.
///
/// Cloneable and `Send`, so a host can keep one in a key handler or a
/// signal thread.
#[derive(Clone, Debug, Default)]
pub struct Interrupter {
    current: Arc<Mutex<Option<AbortHandle>>>,
}

impl Interrupter {
    /// Abort the in-flight command. Returns `false` when nothing is running.
    pub fn interrupt(&self) -> bool {
        let handle = match self.current.lock() {
            Ok(mut current) => current.take(),
            Err(_) => None,
        };

        match handle {
            Some(handle) => {
                handle.abort();
                true
            }
            None => false,
        }
    }

    fn arm(&self) -> AbortRegistration {
        let (handle, registration) = AbortHandle::new_pair();
        if let Ok(mut current) = self.current.lock() {
            *current = Some(handle);
        }
        registration
    }

    fn disarm(&self) {
        if let Ok(mut current) = self.current.lock() {
            *current = None;
        }
    }
}

// ============================================================================
// Session
// ============================================================================

/// One terminal's view of the site.
pub struct ShellSession {
    fs: Rc<VirtualFs>,
    loader: ContentLoader,
    config: ShellConfig,
    nav: NavigationState,
    state: ShellState,
    interrupter: Interrupter,
}

impl ShellSession {
    pub fn new(fs: Rc<VirtualFs>, loader: ContentLoader, config: ShellConfig) -> Self {
        Self {
            fs,
            loader,
            config,
            nav: NavigationState::new(),
            state: ShellState::Idle,
            interrupter: Interrupter::default(),
        }
    }

    /// Current prompt text: `/` followed by the cursor segments.
    pub fn prompt(&self) -> String {
        self.nav.display_path()
    }

    pub fn navigation(&self) -> &NavigationState {
        &self.nav
    }

    pub fn state(&self) -> ShellState {
        self.state
    }

    pub fn interrupter(&self) -> Interrupter {
        self.interrupter.clone()
    }

    /// Show the last-login banner and the initial prompt.
    pub fn start<Tz>(&mut self, store: &dyn KeyValueStore, now: DateTime<Tz>, sink: &mut dyn RenderSink)
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        sink.render(OutputBlock::text(last_login_banner(store, now)));
        sink.prompt_changed(&self.prompt());
    }

    /// Run one submitted line to completion.
    ///
    /// The line is echoed with the prompt it was typed at. Command failures
    /// are rendered as text; nothing escapes to the caller.
    pub async fn submit(&mut self, line: &str, sink: &mut dyn RenderSink) {
        let line = line.trim();
        sink.render(OutputBlock::command(self.prompt(), line));

        self.state = ShellState::Executing;
        let command = Command::parse_line(line);
        debug!("dispatch {:?}", command);

        let ctx = ExecContext {
            fs: &self.fs,
            loader: &self.loader,
            config: &self.config,
        };
        match execute_command(command, &mut self.nav, ctx) {
            Ok(result) => self.deliver(result, sink).await,
            Err(err) => sink.render(OutputBlock::text(err.to_string())),
        }

        self.interrupter.disarm();
        self.state = ShellState::Idle;
        sink.prompt_changed(&self.prompt());
    }

    async fn deliver(&self, result: CommandResult, sink: &mut dyn RenderSink) {
        match result {
            CommandResult::Empty => {}
            CommandResult::Value(output) => render_output(output, sink),
            CommandResult::Clear => sink.clear(),
            CommandResult::Pending(future) => {
                let registration = self.interrupter.arm();
                match Abortable::new(future, registration).await {
                    Ok(output) => render_output(output, sink),
                    Err(_) => debug!("pending output interrupted"),
                }
            }
            CommandResult::Stream { lines, rich } => {
                let registration = self.interrupter.arm();
                let mut lines = Abortable::new(lines, registration);
                while let Some(line) = lines.next().await {
                    sink.render(OutputBlock::chunk(line, rich));
                }
                if lines.is_aborted() {
                    debug!("stream interrupted");
                }
            }
        }
    }

    /// Completion candidates for `line` at the current cursor.
    pub fn completions(&self, line: &str) -> CompletionSet {
        autocomplete::complete(line, &self.nav, &self.fs)
    }

    /// Handle a completion request (Tab).
    ///
    /// Returns the new input value, if it should change. With several
    /// candidates they are shown on one line and the prompt is re-announced.
    pub fn request_completion(&self, line: &str, sink: &mut dyn RenderSink) -> Option<String> {
        match self.completions(line).resolve() {
            AutocompleteResult::None => None,
            AutocompleteResult::Single(value) => Some(value),
            AutocompleteResult::Multiple(prefix, candidates) => {
                sink.render(OutputBlock::text(format_candidates(
                    &candidates,
                    COMPLETION_SEPARATOR,
                )));
                sink.prompt_changed(&self.prompt());
                (!prefix.is_empty()).then_some(prefix)
            }
        }
    }
}

fn render_output(output: Output, sink: &mut dyn RenderSink) {
    if !output.text.is_empty() {
        sink.render(OutputBlock::chunk(output.text, output.rich));
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_manifest;
    use crate::core::MemoryTransport;
    use crate::models::OutputData;
    use crate::utils::MemoryStore;
    use chrono::Utc;

    #[derive(Default)]
    struct RecordingSink {
        blocks: Vec<OutputBlock>,
        prompts: Vec<String>,
        clears: usize,
    }

    impl RecordingSink {
        /// Output text, without command echoes.
        fn texts(&self) -> Vec<&str> {
            self.blocks
                .iter()
                .filter(|b| !b.is_command_echo())
                .map(|b| b.text_content())
                .collect()
        }
    }

    impl RenderSink for RecordingSink {
        fn render(&mut self, block: OutputBlock) {
            self.blocks.push(block);
        }

        fn clear(&mut self) {
            self.blocks.clear();
            self.clears += 1;
        }

        fn prompt_changed(&mut self, prompt: &str) {
            self.prompts.push(prompt.to_string());
        }
    }

    fn session(transport: MemoryTransport) -> ShellSession {
        let fs = VirtualFs::from_manifest(&default_manifest()).unwrap();
        ShellSession::new(
            Rc::new(fs),
            ContentLoader::new(transport),
            ShellConfig::default(),
        )
    }

    fn site() -> MemoryTransport {
        MemoryTransport::new()
            .with_file("content/about.txt", "Hi.\n\nBye.\n")
            .with_file("content/contact.txt", "<b>mail</b>")
            .with_file("config/help.txt", "Available commands:\n  ls")
    }

    #[tokio::test]
    async fn test_echo_and_prompt() {
        let mut shell = session(site());
        let mut sink = RecordingSink::default();

        shell.submit("  cd blog ", &mut sink).await;
        assert_eq!(
            sink.blocks[0].data,
            OutputData::Command {
                prompt: "/".to_string(),
                input: "cd blog".to_string()
            }
        );
        assert_eq!(sink.blocks.len(), 1);
        assert_eq!(sink.prompts, vec!["/blog"]);
        assert_eq!(shell.prompt(), "/blog");
        assert_eq!(shell.state(), ShellState::Idle);
    }

    #[tokio::test]
    async fn test_stream_delivered_line_by_line() {
        let mut shell = session(site());
        let mut sink = RecordingSink::default();

        shell.submit("cat about.txt", &mut sink).await;
        assert_eq!(sink.texts(), vec!["Hi.", "", "Bye."]);
    }

    #[tokio::test]
    async fn test_rich_text_flag() {
        let mut shell = session(site());
        let mut sink = RecordingSink::default();

        shell.submit("cat contact.txt", &mut sink).await;
        let last = sink.blocks.last().unwrap();
        assert!(last.is_rich_text());
        assert_eq!(last.text_content(), "<b>mail</b>");
    }

    #[tokio::test]
    async fn test_help_is_one_block() {
        let mut shell = session(site());
        let mut sink = RecordingSink::default();

        shell.submit("HELP", &mut sink).await;
        assert_eq!(sink.texts(), vec!["Available commands:\n  ls"]);
    }

    #[tokio::test]
    async fn test_errors_rendered_as_text() {
        let mut shell = session(site());
        let mut sink = RecordingSink::default();

        shell.submit("cat missing.txt", &mut sink).await;
        shell.submit("", &mut sink).await;
        assert_eq!(
            sink.texts(),
            vec![
                "cat: missing.txt: No such file",
                "Command not found: \nType 'help' for available commands."
            ]
        );
        assert_eq!(sink.prompts, vec!["/", "/"]);
    }

    #[tokio::test]
    async fn test_failed_fetch_is_one_chunk() {
        let mut shell = session(MemoryTransport::new());
        let mut sink = RecordingSink::default();

        shell.submit("cat about.txt", &mut sink).await;
        assert_eq!(
            sink.texts(),
            vec!["Error loading content/about.txt: 404 Not Found"]
        );
        assert_eq!(shell.state(), ShellState::Idle);
    }

    #[tokio::test]
    async fn test_clear() {
        let mut shell = session(site());
        let mut sink = RecordingSink::default();

        shell.submit("ls", &mut sink).await;
        shell.submit("clear", &mut sink).await;
        assert_eq!(sink.clears, 1);
        assert!(sink.blocks.is_empty());
    }

    #[tokio::test]
    async fn test_cd_up_message() {
        let mut shell = session(site());
        let mut sink = RecordingSink::default();

        shell.submit("cd ..", &mut sink).await;
        assert_eq!(sink.texts(), vec!["Already at root directory"]);
        assert_eq!(shell.prompt(), "/");
    }

    #[tokio::test]
    async fn test_interrupt_stalled_stream() {
        let transport = site().with_stalled("content/about.txt", "first\nsecond");
        let mut shell = session(transport);
        let interrupter = shell.interrupter();
        let mut sink = RecordingSink::default();

        let submit = shell.submit("cat about.txt", &mut sink);
        let interrupt = async {
            // Let the session deliver what is available before stopping it.
            for _ in 0..16 {
                tokio::task::yield_now().await;
            }
            interrupter.interrupt()
        };
        let ((), interrupted) = futures::join!(submit, interrupt);

        assert!(interrupted);
        assert_eq!(sink.texts(), vec!["first"]);
        assert_eq!(shell.state(), ShellState::Idle);
        assert!(!shell.interrupter().interrupt());
    }

    #[test]
    fn test_interrupt_when_idle() {
        let shell = session(site());
        assert!(!shell.interrupter().interrupt());
    }

    #[tokio::test]
    async fn test_ls_idempotent() {
        let mut shell = session(site());
        let mut first = RecordingSink::default();
        let mut second = RecordingSink::default();

        shell.submit("ls blog", &mut first).await;
        shell.submit("ls blog", &mut second).await;
        assert_eq!(first.texts(), second.texts());
    }

    #[test]
    fn test_request_completion() {
        let shell = session(site());
        let mut sink = RecordingSink::default();

        assert_eq!(shell.request_completion("ca", &mut sink), Some("cat".to_string()));
        assert!(sink.blocks.is_empty());

        assert_eq!(shell.request_completion("c", &mut sink), Some("c".to_string()));
        assert_eq!(sink.texts(), vec!["cd    cat    clear"]);
        assert_eq!(sink.prompts, vec!["/"]);

        assert_eq!(shell.request_completion("x", &mut sink), None);
    }

    #[test]
    fn test_start_banner() {
        let mut shell = session(site());
        let store = MemoryStore::new();
        let mut sink = RecordingSink::default();
        let now = Utc.with_ymd_and_hms(2025, 6, 4, 22, 50, 34).unwrap();

        shell.start(&store, now, &mut sink);
        assert_eq!(sink.texts(), vec!["Last login: Wed Jun 4 22:50:34"]);
        assert_eq!(sink.prompts, vec!["/"]);
    }
}
