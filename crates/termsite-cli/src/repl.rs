//! Line-mode terminal host.
//!
//! Reads one line at a time and prints output blocks as plain text. A line
//! ending in a tab character is a completion request instead of a command.
//! Ctrl-C stops the running command, or quits when nothing is running.

use std::io::{BufRead, Write};
use std::process;

use anyhow::{Context, Result};
use futures::executor::block_on;
use log::{debug, warn};
use termsite::{Interrupter, OutputBlock, OutputData, RenderSink, ShellSession};

/// Prints output blocks to a writer.
pub struct TerminalSink<W: Write> {
    out: W,
    /// Print command echoes (useful when input is not a tty)
    echo: bool,
}

impl<W: Write> TerminalSink<W> {
    pub fn new(out: W, echo: bool) -> Self {
        Self { out, echo }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_line(&mut self, text: &str) {
        if let Err(err) = writeln!(self.out, "{}", text) {
            warn!("write failed: {}", err);
        }
    }
}

impl<W: Write> RenderSink for TerminalSink<W> {
    fn render(&mut self, block: OutputBlock) {
        match block.data {
            OutputData::Command { prompt, input } => {
                if self.echo {
                    self.write_line(&format!("{}> {}", prompt, input));
                }
            }
            OutputData::Text(text) | OutputData::RichText(text) => self.write_line(&text),
        }
    }

    fn clear(&mut self) {
        // ANSI: erase screen, cursor home
        if let Err(err) = write!(self.out, "\x1b[2J\x1b[H") {
            warn!("write failed: {}", err);
        }
    }

    fn prompt_changed(&mut self, prompt: &str) {
        if let Err(err) = write!(self.out, "{}> ", prompt).and_then(|_| self.out.flush()) {
            warn!("write failed: {}", err);
        }
    }
}

/// Route Ctrl-C to `interrupter`.
///
/// The handler runs on its own thread. With no command in flight it exits
/// with status 130, as an unhandled SIGINT would.
pub fn install_interrupt_handler(interrupter: Interrupter) -> Result<()> {
    ctrlc::set_handler(move || {
        if interrupter.interrupt() {
            debug!("interrupted running command");
        } else {
            process::exit(130);
        }
    })
    .context("failed to install Ctrl-C handler")
}

/// Drive `session` until `input` is exhausted.
pub fn run<R: BufRead, W: Write>(session: &mut ShellSession, input: R, sink: &mut TerminalSink<W>) -> Result<()> {
    for line in input.lines() {
        let line = line?;

        if let Some(partial) = line.strip_suffix('\t') {
            match session.request_completion(partial, sink) {
                Some(value) => sink.write_line(&value),
                None => sink.prompt_changed(&session.prompt()),
            }
            continue;
        }

        block_on(session.submit(&line, sink));
    }
    sink.write_line("");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;
    use std::thread;
    use std::time::Duration;
    use termsite::config::default_manifest;
    use termsite::{ContentLoader, MemoryTransport, ShellConfig, VirtualFs};

    fn session_with(transport: MemoryTransport) -> ShellSession {
        let fs = VirtualFs::from_manifest(&default_manifest()).unwrap();
        ShellSession::new(Rc::new(fs), ContentLoader::new(transport), ShellConfig::default())
    }

    fn session() -> ShellSession {
        session_with(MemoryTransport::new().with_file("content/about.txt", "Hello\nthere\n"))
    }

    fn transcript(script: &str, echo: bool) -> String {
        let mut shell = session();
        let mut sink = TerminalSink::new(Vec::new(), echo);
        run(&mut shell, script.as_bytes(), &mut sink).unwrap();
        String::from_utf8(sink.into_inner()).unwrap()
    }

    #[test]
    fn test_script_transcript() {
        let out = transcript("cat about.txt\ncd blog\n", true);
        assert_eq!(out, "/> cat about.txt\nHello\nthere\n/> /> cd blog\n/blog> \n");
    }

    #[test]
    fn test_completion_request() {
        let out = transcript("ca\t\nc\t\n", false);
        assert_eq!(out, "cat\ncd    cat    clear\n/> c\n\n");
    }

    #[test]
    fn test_clear_sequence() {
        let out = transcript("clear\n", false);
        assert_eq!(out, "\x1b[2J\x1b[H/> \n");
    }

    #[test]
    fn test_interrupt_from_another_thread() {
        let transport = MemoryTransport::new().with_stalled("content/about.txt", "first\nsecond");
        let mut shell = session_with(transport);
        let interrupter = shell.interrupter();

        // Stands in for the Ctrl-C handler thread.
        let handler = thread::spawn(move || {
            while !interrupter.interrupt() {
                thread::sleep(Duration::from_millis(1));
            }
        });

        let mut sink = TerminalSink::new(Vec::new(), false);
        run(&mut shell, "cat about.txt\ncd blog\n".as_bytes(), &mut sink).unwrap();
        handler.join().unwrap();

        let out = String::from_utf8(sink.into_inner()).unwrap();
        assert!(!out.contains("second"));
        assert!(out.ends_with("/> /blog> \n"));
        assert!(!shell.interrupter().interrupt());
    }
}
