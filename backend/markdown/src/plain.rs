use pulldown_cmark::{Event, Parser, Tag};

/// Flatten markdown to readable plain text, dropping all syntax.
///
/// Block ends become newlines; soft breaks become spaces. Inline HTML is dropped.
pub fn to_plain_text(markdown: &str) -> String {
    let mut out = String::new();
    for event in Parser::new(markdown) {
        match event {
            Event::Text(text) | Event::Code(text) => out.push_str(&text),
            Event::SoftBreak => out.push(' '),
            Event::HardBreak => out.push('\n'),
            Event::End(
                Tag::Paragraph
                | Tag::Heading(..)
                | Tag::Item
                | Tag::BlockQuote
                | Tag::CodeBlock(_),
            ) => {
                if !out.ends_with('\n') {
                    out.push('\n');
                }
            }
            _ => {}
        }
    }
    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_heading_and_emphasis_markers() {
        assert_eq!(to_plain_text("## Hello *world*"), "Hello world");
    }

    #[test]
    fn keeps_list_items_on_separate_lines() {
        assert_eq!(to_plain_text("- one\n- `two`\n"), "one\ntwo");
    }

    #[test]
    fn soft_breaks_become_spaces() {
        assert_eq!(
            to_plain_text("> quoted line\n> continues [here](http://x)"),
            "quoted line continues here"
        );
    }
}
