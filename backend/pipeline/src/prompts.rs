//! Prompt text for every model call the pipeline makes.

use layoutforge_core::{DesignDescriptor, LayoutPreference};

/// Placeholder the wrapper template must contain exactly once.
pub const PLACEHOLDER: &str = "{{CONTENT}}";

pub const DESIGN_SYSTEM: &str = "\
You are an expert visual designer for long-form articles.
Read the style request and the content sample, then return a JSON design system
whose values are Tailwind CSS v3 utility class strings.

Rules:
1. Return only a JSON object with the documented fields. No prose.
2. Every style field holds valid Tailwind CSS v3 utility classes.
3. layoutType is one of \"card\", \"flat\", \"multi-card\".
4. highlightColor is a hex color such as \"#4f46e5\".
5. Match the requested mood:
   - Social or WeChat: decorative H2s (pills, borders), relaxed leading.
   - Tech: dark or gradient themes, mono accents.
   - Classic: serif fonts, paper-like backgrounds.
6. heading2 is the main visual anchor. Be inventive with gradients, capsules and borders.";

pub const CONTENT_SYSTEM: &str = "\
You are a senior content editor. Rewrite the given text segment so it matches
the requested style, for example a WeChat official account post or a tech blog.

Rules:
1. Output Markdown only. No JSON, no preamble such as \"Here is the rewritten text\".
2. Add ## headings where the text lacks structure, with a fitting emoji.
3. Bold key phrases. Keep paragraphs short and readable.
4. The segment belongs to a longer document. Keep continuity with the previous context.
5. Only add a top-level # title when this is the start of the document.
6. Keep the original language and meaning. Do not invent facts.";

const CARD_SYSTEM: &str = "\
You convert one Markdown segment into one HTML card for rich-text editors such as WeChat.

Constraints:
1. Output valid HTML only: no explanations, no comments, no code fences.
2. Output exactly ONE top-level <section> element containing the whole card.
3. No <html>, <head>, <body>, <style>, <script> or <link> tags.
4. Style with inline style attributes or with the utility classes of the design
   system below; classes are converted to inline styles afterwards.
5. Use nested <section>, <p> and <span> elements as WeChat rich text does.
6. Use {HIGHLIGHT} for borders, decorative bars and emphasis.
7. Turn headings into emphasized lines inside the card and lists into bulleted paragraphs.
8. Keep the original language and meaning. Do not add content.";

const WRAPPER_SYSTEM: &str = "\
You design the outer page shell that surrounds a sequence of article cards.

Constraints:
1. Output valid HTML only: no explanations, no comments, no code fences.
2. No <html>, <head>, <body>, <style>, <script> or <link> tags.
3. Put the literal text {{CONTENT}} exactly once, where the cards belong.
4. Style with inline style attributes or with the utility classes of the design
   system; classes are converted to inline styles afterwards.
5. Keep it light: a background, a centered container, optional header and footer ornaments.";

pub fn design_prompt(
    style_request: &str,
    content_sample: &str,
    layout: &LayoutPreference,
    variation: Option<(usize, usize)>,
) -> String {
    let mut prompt = format!(
        "STYLE REQUEST: {style_request}\nLAYOUT PREFERENCE: {layout}\nCONTENT SAMPLE:\n{content_sample}\n"
    );
    if let Some((n, of)) = variation {
        prompt.push_str(&format!(
            "\nVARIATION {n} OF {of}: give this design a distinctly different palette and heading \
             treatment from the other variations while honoring the style request.\n"
        ));
    }
    prompt
}

pub fn enhance_prompt(style_request: &str, previous_context: &str, is_first: bool, chunk: &str) -> String {
    format!(
        "STYLE REQUEST: {style_request}\n\
         PREVIOUS CONTEXT (end of last segment): \"{previous_context}\"\n\
         IS START OF DOCUMENT: {is_first}\n\n\
         TEXT SEGMENT TO REWRITE:\n{chunk}"
    )
}

pub fn card_system(highlight_color: &str) -> String {
    CARD_SYSTEM.replace("{HIGHLIGHT}", highlight_color)
}

/// `position` is one-based.
pub fn card_prompt(block: &str, position: usize, total: usize, design: &DesignDescriptor) -> String {
    format!(
        "Convert this one Markdown segment into one card.\n\n\
         Card index: {position} of {total}\n\
         Highlight color: {highlight}\n\n\
         Design system (JSON):\n{design_json}\n\n\
         Segment (Markdown, raw):\n---\n{block}\n---\n\n\
         Return only the HTML of this single card.",
        highlight = design.highlight_color,
        design_json = design.to_prompt_json(),
    )
}

pub fn wrapper_system() -> &'static str {
    WRAPPER_SYSTEM
}

pub fn wrapper_prompt(design: &DesignDescriptor) -> String {
    format!(
        "Design system (JSON):\n{}\n\n\
         Build the page shell for theme \"{}\" with layout \"{}\". \
         Place {PLACEHOLDER} where the cards go. Return only the HTML.",
        design.to_prompt_json(),
        design.theme_name,
        design.layout_type,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use layoutforge_core::presets::default_design;

    #[test]
    fn enhance_prompt_carries_context_and_flag() {
        let prompt = enhance_prompt("tech blog", "tail of last", false, "raw chunk\n");
        assert!(prompt.contains("STYLE REQUEST: tech blog"));
        assert!(prompt.contains("\"tail of last\""));
        assert!(prompt.contains("IS START OF DOCUMENT: false"));
        assert!(prompt.ends_with("raw chunk\n"));
    }

    #[test]
    fn card_prompt_is_one_based_and_embeds_design() {
        let design = default_design();
        let prompt = card_prompt("# Title", 1, 3, &design);
        assert!(prompt.contains("Card index: 1 of 3"));
        assert!(prompt.contains(&design.highlight_color));
        assert!(prompt.contains("\"themeName\""));
        assert!(card_system("#123456").contains("#123456"));
    }

    #[test]
    fn design_prompt_mentions_variation() {
        let layout = LayoutPreference::Auto;
        assert!(!design_prompt("s", "c", &layout, None).contains("VARIATION"));
        assert!(design_prompt("s", "c", &layout, Some((2, 3))).contains("VARIATION 2 OF 3"));
    }
}
