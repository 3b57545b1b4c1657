//! Text segmentation along safe boundaries.

use once_cell::sync::Lazy;
use regex::Regex;

use layoutforge_core::{MarkdownBlock, TextChunk};

/// One or more blank lines.
static BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n").unwrap());

/// Split text into chunks of at most `max_chars` characters, never splitting a line.
///
/// Lines are appended to a running buffer; the buffer is sealed when the next
/// line would push it past the bound and it already holds something. A single
/// line longer than the bound becomes its own oversized chunk. Every line keeps
/// a trailing `\n`.
pub fn chunk_by_size(text: &str, max_chars: usize) -> Vec<TextChunk> {
    let mut chunks = Vec::new();
    let mut buffer = String::new();
    let mut buffer_chars = 0usize;

    for line in text.split('\n') {
        let line_chars = line.chars().count();
        if buffer_chars + line_chars > max_chars && !buffer.is_empty() {
            chunks.push(TextChunk {
                index: chunks.len(),
                text: std::mem::take(&mut buffer),
            });
            buffer_chars = 0;
        }
        buffer.push_str(line);
        buffer.push('\n');
        buffer_chars += line_chars + 1;
    }

    if !buffer.trim().is_empty() {
        chunks.push(TextChunk {
            index: chunks.len(),
            text: buffer,
        });
    }

    chunks
}

/// Split markdown into blank-line-delimited blocks, trimmed, empties dropped.
pub fn block_split(text: &str) -> Vec<MarkdownBlock> {
    let normalized = text.replace("\r\n", "\n");
    BLANK_LINES
        .split(&normalized)
        .map(str::trim)
        .filter(|block| !block.is_empty())
        .enumerate()
        .map(|(index, block)| MarkdownBlock {
            index,
            text: block.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(chunks: &[TextChunk]) -> Vec<&str> {
        chunks.iter().map(|c| c.text.as_str()).collect()
    }

    #[test]
    fn seals_chunk_when_next_line_overflows() {
        let chunks = chunk_by_size("abcdefghij\nklmno", 10);
        assert_eq!(texts(&chunks), vec!["abcdefghij\n", "klmno\n"]);
        assert!(chunks[0].is_first());
        assert_eq!(chunks[1].index, 1);
    }

    #[test]
    fn packs_short_lines_together() {
        let chunks = chunk_by_size("a\nb\nc", 100);
        assert_eq!(texts(&chunks), vec!["a\nb\nc\n"]);
    }

    #[test]
    fn oversized_line_is_kept_whole() {
        let long = "x".repeat(25);
        let input = format!("short\n{long}\ntail");
        let chunks = chunk_by_size(&input, 10);
        assert_eq!(texts(&chunks), vec!["short\n", &format!("{long}\n"), "tail\n"]);
    }

    #[test]
    fn counts_characters_not_bytes() {
        // Five CJK characters are 15 bytes.
        let chunks = chunk_by_size("排版生成器\n内容", 8);
        assert_eq!(chunks.len(), 1);
    }

    #[test]
    fn blank_input_yields_no_chunks() {
        assert!(chunk_by_size("", 10).is_empty());
        assert!(chunk_by_size("  \n\n \n", 10).is_empty());
    }

    #[test]
    fn joined_chunks_reproduce_input() {
        let input = "# Title\n\nFirst paragraph is here.\nSecond line.\n\n## Next\nMore text follows.";
        for bound in [1, 5, 12, 40, 1000] {
            let joined: String = chunk_by_size(input, bound)
                .into_iter()
                .map(|c| c.text)
                .collect();
            assert_eq!(joined.trim_end(), input.trim_end(), "bound {bound}");
        }
    }

    #[test]
    fn splits_blocks_on_blank_lines() {
        let blocks = block_split("# Title\n\nPara one.\n\nPara two.");
        let texts: Vec<_> = blocks.iter().map(|b| b.text.as_str()).collect();
        assert_eq!(texts, vec!["# Title", "Para one.", "Para two."]);
        assert_eq!(blocks[2].index, 2);
    }

    #[test]
    fn block_split_normalizes_crlf_and_collapses_gaps() {
        let blocks = block_split("one\r\n\r\n\r\n  \r\ntwo\r\nstill two\n \t \nthree\n");
        let texts: Vec<_> = blocks.iter().map(|b| b.text.as_str()).collect();
        assert_eq!(texts, vec!["one", "two\nstill two", "three"]);
    }

    #[test]
    fn block_split_never_returns_blank_blocks() {
        assert!(block_split("").is_empty());
        assert!(block_split("\n\n   \n\n").is_empty());
        for block in block_split("\n\na\n\n\n\nb\n\n") {
            assert!(!block.text.trim().is_empty());
        }
    }
}
