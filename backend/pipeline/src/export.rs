use serde::Serialize;
use tracing::info;

use layoutforge_core::{
    CancelToken, Card, CardExportError, CardFailurePolicy, DesignDescriptor, EventSink, ForgeError,
    GenerationProvider, MarkdownBlock,
};
use layoutforge_markdown::{escape_html, to_plain_text};
use layoutforge_style::rewrite_markup;

use crate::cards::export_cards;
use crate::wrapper::generate_wrapper;

/// A finished export: the composed fragment plus what went into it.
#[derive(Debug, Serialize)]
pub struct ExportArtifact {
    /// Self-contained fragment with inline styles only.
    pub html: String,
    pub cards: Vec<Card>,
    #[serde(skip)]
    pub failures: Vec<CardExportError>,
    pub wrapper_fallback: bool,
}

/// Minimal card holding the block's plain text in the design's paragraph style.
pub fn fallback_card(block: &MarkdownBlock, design: &DesignDescriptor) -> String {
    let classes = format!("{} {}", design.paragraph, design.text_color);
    let text = escape_html(&to_plain_text(&block.text));
    rewrite_markup(&format!(
        "<section><p class=\"{}\">{}</p></section>",
        classes.trim(),
        text
    ))
}

/// Export `markdown` as cards inside a generated wrapper.
///
/// Cards are produced first, then the wrapper. Failed cards are replaced or
/// dropped according to `policy`.
pub async fn export_document(
    provider: &dyn GenerationProvider,
    design: &DesignDescriptor,
    markdown: &str,
    policy: CardFailurePolicy,
    events: &EventSink,
    cancel: &CancelToken,
) -> Result<ExportArtifact, ForgeError> {
    let report = export_cards(provider, design, markdown, events, cancel).await?;
    let wrapper = generate_wrapper(provider, design, events, cancel).await?;

    let mut parts = Vec::with_capacity(report.total());
    let mut cards = Vec::new();
    let mut failures = Vec::new();
    for (block, result) in report.blocks.iter().zip(report.results) {
        match result {
            Ok(card) => {
                parts.push(card.html.clone());
                cards.push(card);
            }
            Err(e) => {
                if policy == CardFailurePolicy::Fallback {
                    parts.push(fallback_card(block, design));
                }
                failures.push(e);
            }
        }
    }

    let html = wrapper.compose(&parts.join("\n"));
    info!(
        cards = cards.len(),
        failed = failures.len(),
        ?policy,
        wrapper_fallback = wrapper.fallback,
        bytes = html.len(),
        "Export composed"
    );
    Ok(ExportArtifact {
        html,
        cards,
        failures,
        wrapper_fallback: wrapper.fallback,
    })
}
