//! Code-fence cleanup for model output.

/// Remove every code-fence marker line (` ``` ` or ` ```lang `) and trim.
///
/// Used for outputs that must be pure markup or JSON, where fences can only be
/// wrapping artifacts.
pub fn strip_code_fences(text: &str) -> String {
    if !text.contains("```") {
        return text.trim().to_string();
    }
    text.lines()
        .filter(|line| !line.trim_start().starts_with("```"))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Remove a single fence wrapping the whole text, leaving inner fences intact.
///
/// Used for markdown outputs, which may legitimately contain code blocks.
pub fn unwrap_outer_fence(text: &str) -> String {
    let trimmed = text.trim();
    if !trimmed.starts_with("```") || !trimmed.ends_with("```") || trimmed.len() < 6 {
        return trimmed.to_string();
    }
    let Some(first_newline) = trimmed.find('\n') else {
        return trimmed.to_string();
    };
    let inner = &trimmed[first_newline + 1..trimmed.len() - 3];
    inner.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_fences_around_markup() {
        let raw = "```html\n<section>\n  <p>x</p>\n</section>\n```\n";
        assert_eq!(strip_code_fences(raw), "<section>\n  <p>x</p>\n</section>");
    }

    #[test]
    fn plain_text_is_only_trimmed() {
        assert_eq!(strip_code_fences("  {\"a\": 1}\n"), "{\"a\": 1}");
    }

    #[test]
    fn unwraps_single_outer_fence() {
        let raw = "```markdown\n## Title\n\n```rust\nfn main() {}\n```\n\nDone.\n```";
        assert_eq!(
            unwrap_outer_fence(raw),
            "## Title\n\n```rust\nfn main() {}\n```\n\nDone."
        );
    }

    #[test]
    fn leaves_unfenced_markdown_alone() {
        let raw = "Intro\n\n```\ncode\n```";
        assert_eq!(unwrap_outer_fence(raw), raw);
    }
}
