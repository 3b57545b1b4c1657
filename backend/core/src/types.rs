use serde::{Deserialize, Serialize};

/// A contiguous, line-aligned slice of source text used for content enhancement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChunk {
    pub index: usize,
    pub text: String,
}

impl TextChunk {
    pub fn is_first(&self) -> bool {
        self.index == 0
    }
}

/// One blank-line-delimited segment of styled markdown, exported as one card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkdownBlock {
    pub index: usize,
    pub text: String,
}

/// Result of generating one card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Zero-based position in block order.
    pub index: usize,
    pub total: usize,
    pub html: String,
    pub complete: bool,
}

impl Card {
    pub fn new(index: usize, total: usize) -> Self {
        Self {
            index,
            total,
            html: String::new(),
            complete: false,
        }
    }

    /// Append a streamed fragment. The buffer only grows.
    pub fn push_fragment(&mut self, fragment: &str) {
        self.html.push_str(fragment);
    }

    /// Replace the accumulated markup with its post-processed form.
    pub fn finish(&mut self, html: String) {
        self.html = html;
        self.complete = true;
    }
}

/// What an export does with a card whose generation failed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardFailurePolicy {
    /// Substitute a minimal styled paragraph holding the block's plain text.
    #[default]
    Fallback,
    /// Leave the card out of the document.
    Skip,
}

impl std::str::FromStr for CardFailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fallback" => Ok(Self::Fallback),
            "skip" => Ok(Self::Skip),
            other => Err(format!("unknown card failure policy `{other}` (expected fallback or skip)")),
        }
    }
}
