//! Terminal output types handed to the render sink.

use std::sync::atomic::{AtomicUsize, Ordering};

/// One block of output delivered to the host UI.
#[derive(Clone, Debug)]
pub struct OutputBlock {
    /// Unique ID for keying rendered blocks
    pub id: usize,
    /// The actual output data
    pub data: OutputData,
}

/// The content of an output block
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutputData {
    /// Echo of a submitted line with the prompt it was typed at
    Command { prompt: String, input: String },
    /// Plain text, escaped by the renderer
    Text(String),
    /// Markup the renderer may display as rich text
    RichText(String),
}

// Global counter for generating unique IDs
static OUTPUT_BLOCK_COUNTER: AtomicUsize = AtomicUsize::new(0);

impl OutputBlock {
    fn new(data: OutputData) -> Self {
        Self {
            id: OUTPUT_BLOCK_COUNTER.fetch_add(1, Ordering::Relaxed),
            data,
        }
    }

    pub fn text(s: impl Into<String>) -> Self {
        Self::new(OutputData::Text(s.into()))
    }

    pub fn rich_text(s: impl Into<String>) -> Self {
        Self::new(OutputData::RichText(s.into()))
    }

    pub fn command(prompt: impl Into<String>, input: impl Into<String>) -> Self {
        Self::new(OutputData::Command {
            prompt: prompt.into(),
            input: input.into(),
        })
    }

    /// Build a block from a chunk's text and its rich-text flag.
    pub fn chunk(s: impl Into<String>, rich: bool) -> Self {
        if rich {
            Self::rich_text(s)
        } else {
            Self::text(s)
        }
    }

    /// The displayed text (for echoes, the input without its prompt).
    pub fn text_content(&self) -> &str {
        match &self.data {
            OutputData::Command { input, .. } => input,
            OutputData::Text(s) | OutputData::RichText(s) => s,
        }
    }

    pub fn is_command_echo(&self) -> bool {
        matches!(self.data, OutputData::Command { .. })
    }

    pub fn is_rich_text(&self) -> bool {
        matches!(self.data, OutputData::RichText(_))
    }
}

impl PartialEq for OutputBlock {
    fn eq(&self, other: &Self) -> bool {
        // Only compare data, not ID
        self.data == other.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_flags() {
        let echo = OutputBlock::command("/blog", "ls");
        assert!(echo.is_command_echo());
        assert!(!echo.is_rich_text());
        assert_eq!(echo.text_content(), "ls");

        let rich = OutputBlock::chunk("<a href=\"mailto:x\">x</a>", true);
        assert!(rich.is_rich_text());
        assert!(!OutputBlock::chunk("plain", false).is_rich_text());
    }

    #[test]
    fn test_unique_ids() {
        let first = OutputBlock::text("same");
        let second = OutputBlock::text("same");
        assert_ne!(first.id, second.id);
        assert_eq!(first, second);
    }
}
