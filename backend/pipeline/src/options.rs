use serde::{Deserialize, Serialize};

use layoutforge_core::CardFailurePolicy;

pub const DEFAULT_CHUNK_SIZE: usize = 1000;
pub const DEFAULT_CONTEXT_CHARS: usize = 300;
pub const DEFAULT_SAMPLE_CHARS: usize = 800;

/// Tunables of a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PipelineOptions {
    /// Upper bound, in characters, of one enhancement chunk.
    pub chunk_size: usize,
    /// Tail of the previous enhanced segment passed as context.
    pub context_chars: usize,
    /// Leading content characters shown to the design generator.
    pub sample_chars: usize,
    pub card_failure: CardFailurePolicy,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            context_chars: DEFAULT_CONTEXT_CHARS,
            sample_chars: DEFAULT_SAMPLE_CHARS,
            card_failure: CardFailurePolicy::default(),
        }
    }
}

/// First `n` characters of `text`.
pub(crate) fn head_chars(text: &str, n: usize) -> &str {
    match text.char_indices().nth(n) {
        Some((byte, _)) => &text[..byte],
        None => text,
    }
}

/// Last `n` characters of `text`.
pub(crate) fn tail_chars(text: &str, n: usize) -> &str {
    if n == 0 {
        return "";
    }
    match text.char_indices().rev().nth(n - 1) {
        Some((byte, _)) => &text[byte..],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slices_by_characters() {
        assert_eq!(head_chars("排版生成器", 2), "排版");
        assert_eq!(head_chars("ab", 10), "ab");
        assert_eq!(tail_chars("排版生成器", 3), "生成器");
        assert_eq!(tail_chars("ab", 10), "ab");
        assert_eq!(tail_chars("ab", 0), "");
    }
}
