//! Attribute-level rewriting and cleanup of generated HTML fragments.

use std::ops::Range;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::debug;

use crate::translate::to_inline_style;

/// A start tag, skipping over quoted attribute values.
static START_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<[A-Za-z][^\s/>]*(?:"[^"]*"|'[^']*'|[^'">])*>"#).unwrap()
});

/// One attribute inside a start tag: name plus optional quoted or bare value.
static ATTRIBUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\s+([^\s"'>/=]+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#).unwrap()
});

/// Start, end, and self-closing tags plus comments, for nesting analysis.
static TAG_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)<!--.*?-->|<(/)?([A-Za-z][A-Za-z0-9-]*)(?:"[^"]*"|'[^']*'|[^'">])*>"#)
        .unwrap()
});

/// Where a start tag opens, whether or not it is well formed.
static TAG_OPEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[A-Za-z]").unwrap());

/// A `class` attribute whose value may be missing its closing quote.
static LOOSE_CLASS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\sclass\s*=\s*(?:"[^">]*"?|'[^'>]*'?|[^\s>]*)"#).unwrap()
});

static SCRIPT_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>").unwrap());
static STYLE_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<style\b[^>]*>.*?</style\s*>").unwrap());
static HEAD_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<head\b[^>]*>.*?</head\s*>").unwrap());
static DOCTYPE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<!doctype[^>]*>").unwrap());
static SHELL_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)</?(?:html|body|head|link|meta|title|script|style)\b[^>]*>").unwrap()
});

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

struct Attribute<'a> {
    name: &'a str,
    value: &'a str,
    span: Range<usize>,
}

fn attributes(tag: &str) -> Vec<Attribute<'_>> {
    let name_end = tag[1..]
        .find(|c: char| c.is_whitespace() || c == '>' || c == '/')
        .map_or(tag.len(), |i| i + 1);
    ATTRIBUTE
        .captures_iter(&tag[name_end..])
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let name = caps.get(1)?.as_str();
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map_or("", |m| m.as_str());
            Some(Attribute {
                name,
                value,
                span: name_end + whole.start()..name_end + whole.end(),
            })
        })
        .collect()
}

/// Apply non-overlapping `(span, replacement)` edits in order.
fn splice(source: &str, mut edits: Vec<(Range<usize>, String)>) -> String {
    edits.sort_by_key(|(span, _)| span.start);
    let mut out = String::with_capacity(source.len());
    let mut cursor = 0;
    for (span, replacement) in edits {
        out.push_str(&source[cursor..span.start]);
        out.push_str(&replacement);
        cursor = span.end;
    }
    out.push_str(&source[cursor..]);
    out
}

fn rewrite_start_tag(tag: &str) -> Option<String> {
    let attrs = attributes(tag);
    let classes: Vec<&Attribute> = attrs
        .iter()
        .filter(|a| a.name.eq_ignore_ascii_case("class"))
        .collect();
    let first_class = classes.first()?;

    let class_list = classes.iter().map(|a| a.value).collect::<Vec<_>>().join(" ");
    let translated = to_inline_style(&class_list).replace('"', "'");
    let style = attrs.iter().find(|a| a.name.eq_ignore_ascii_case("style"));

    let mut edits: Vec<(Range<usize>, String)> = classes
        .iter()
        .map(|a| (a.span.clone(), String::new()))
        .collect();

    if !translated.is_empty() {
        match style {
            Some(style) => {
                let existing = style.value.trim().replace('"', "'");
                let merged = if existing.is_empty() {
                    translated
                } else {
                    format!("{translated} {existing}")
                };
                edits.push((style.span.clone(), format!(" style=\"{merged}\"")));
            }
            None => {
                edits[0] = (first_class.span.clone(), format!(" style=\"{translated}\""));
            }
        }
    }

    Some(splice(tag, edits))
}

/// Replace every `class` attribute with the equivalent inline `style`.
///
/// Translated declarations are placed before any existing inline style so the
/// author's own declarations still win. A class list that translates to
/// nothing is removed outright. Text outside start tags is never touched.
pub fn rewrite_markup(html: &str) -> String {
    let rewritten = START_TAG.replace_all(html, |caps: &Captures| {
        let tag = &caps[0];
        rewrite_start_tag(tag).unwrap_or_else(|| tag.to_string())
    });
    strip_broken_class_attributes(&rewritten)
}

/// Drop `class` attributes from start tags the tag pattern cannot parse,
/// such as one with an unterminated quoted value. The broken tag is taken to
/// run until the next `<`.
fn strip_broken_class_attributes(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut cursor = 0;
    for open in TAG_OPEN.find_iter(html) {
        let pos = open.start();
        if pos < cursor {
            continue;
        }
        if let Some(tag) = START_TAG.find_at(html, pos).filter(|m| m.start() == pos) {
            out.push_str(&html[cursor..tag.end()]);
            cursor = tag.end();
            continue;
        }
        let end = html[pos + 1..].find('<').map_or(html.len(), |i| pos + 1 + i);
        let broken = &html[pos..end];
        if LOOSE_CLASS.is_match(broken) {
            debug!(tag = broken, "dropping class from malformed start tag");
        }
        out.push_str(&html[cursor..pos]);
        out.push_str(&LOOSE_CLASS.replace_all(broken, ""));
        cursor = end;
    }
    out.push_str(&html[cursor..]);
    out
}

/// Strip anything that must not survive into an exported fragment.
///
/// Removes scripts, stylesheets, the document shell (`<!doctype>`, `html`,
/// `head`, `body`, `link`, `meta`), inline event handlers and `javascript:`
/// URLs. Content inside `html`/`body` is kept.
pub fn sanitize_fragment(html: &str) -> String {
    let html = SCRIPT_BLOCK.replace_all(html, "");
    let html = STYLE_BLOCK.replace_all(&html, "");
    let html = HEAD_BLOCK.replace_all(&html, "");
    let html = DOCTYPE.replace_all(&html, "");
    let html = SHELL_TAG.replace_all(&html, "");
    let html = START_TAG.replace_all(&html, |caps: &Captures| strip_unsafe_attributes(&caps[0]));
    html.trim().to_string()
}

fn strip_unsafe_attributes(tag: &str) -> String {
    let edits: Vec<(Range<usize>, String)> = attributes(tag)
        .into_iter()
        .filter(|a| {
            let name = a.name.to_ascii_lowercase();
            name.starts_with("on")
                || ((name == "href" || name == "src")
                    && a.value.trim_start().to_ascii_lowercase().starts_with("javascript:"))
        })
        .map(|a| (a.span, String::new()))
        .collect();
    if edits.is_empty() {
        tag.to_string()
    } else {
        splice(tag, edits)
    }
}

/// Byte ranges of every tag and comment. Whatever lies between them is text.
pub fn markup_spans(html: &str) -> Vec<Range<usize>> {
    TAG_TOKEN.find_iter(html).map(|m| m.range()).collect()
}

/// Number of top-level elements, or `None` when the fragment has stray
/// top-level text or unbalanced closing tags.
pub fn top_level_elements(html: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut count = 0usize;
    let mut cursor = 0usize;

    for caps in TAG_TOKEN.captures_iter(html) {
        let Some(whole) = caps.get(0) else { continue };
        if depth == 0 && !html[cursor..whole.start()].trim().is_empty() {
            return None;
        }
        cursor = whole.end();

        let Some(name) = caps.get(2) else {
            continue; // comment
        };
        let closing = caps.get(1).is_some();
        let name = name.as_str().to_ascii_lowercase();
        let self_closing = whole.as_str().ends_with("/>") || VOID_ELEMENTS.contains(&name.as_str());

        if closing {
            if self_closing {
                continue;
            }
            depth = depth.checked_sub(1)?;
        } else {
            if depth == 0 {
                count += 1;
            }
            if !self_closing {
                depth += 1;
            }
        }
    }

    if depth == 0 && !html[cursor..].trim().is_empty() {
        return None;
    }
    Some(count)
}

/// Wrap the fragment in a `<section>` unless it is exactly one element.
pub fn ensure_single_root(html: &str) -> String {
    let trimmed = html.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    match top_level_elements(trimmed) {
        Some(1) => trimmed.to_string(),
        other => {
            debug!(top_level = ?other, "wrapping fragment in a single root");
            format!("<section>{trimmed}</section>")
        }
    }
}
