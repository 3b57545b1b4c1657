use futures::StreamExt;
use tracing::{debug, info, warn};

use layoutforge_core::{
    CancelToken, Card, CardExportError, DesignDescriptor, EventSink, ForgeError, GenerationProvider,
    GenerationRequest, MarkdownBlock, PipelineEvent,
};
use layoutforge_markdown::{block_split, strip_code_fences};
use layoutforge_style::{ensure_single_root, rewrite_markup, sanitize_fragment};

use crate::guard::until_cancelled;
use crate::prompts;

/// Per-card outcomes of one export run, in block order.
#[derive(Debug)]
pub struct CardExportReport {
    pub blocks: Vec<MarkdownBlock>,
    pub results: Vec<Result<Card, CardExportError>>,
}

impl CardExportReport {
    pub fn total(&self) -> usize {
        self.blocks.len()
    }

    pub fn cards(&self) -> impl Iterator<Item = &Card> {
        self.results.iter().filter_map(|r| r.as_ref().ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = &CardExportError> {
        self.results.iter().filter_map(|r| r.as_ref().err())
    }

    /// Completed cards joined with `\n`, in block order.
    pub fn joined_html(&self) -> String {
        self.cards()
            .map(|c| c.html.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Turn raw model output into a clean single-root fragment with inline styles.
pub fn finalize_fragment(raw: &str) -> String {
    let html = strip_code_fences(raw);
    let html = sanitize_fragment(&html);
    let html = ensure_single_root(&html);
    rewrite_markup(&html)
}

/// Stream one HTML card per markdown block, strictly in order.
///
/// A card whose stream cannot be opened, breaks mid-way, or yields no markup
/// is reported as failed and the loop moves on. Only cancellation aborts.
pub async fn export_cards(
    provider: &dyn GenerationProvider,
    design: &DesignDescriptor,
    markdown: &str,
    events: &EventSink,
    cancel: &CancelToken,
) -> Result<CardExportReport, ForgeError> {
    let blocks = block_split(markdown);
    let total = blocks.len();
    info!(cards = total, theme = %design.theme_name, "Exporting cards");

    let system = prompts::card_system(&design.highlight_color);
    let mut results = Vec::with_capacity(total);

    for block in &blocks {
        events
            .emit(PipelineEvent::CardStarted {
                index: block.index,
                total,
            })
            .await;

        let result = stream_card(provider, design, &system, block, total, events, cancel).await?;
        match &result {
            Ok(card) => {
                events
                    .emit(PipelineEvent::CardCompleted {
                        index: card.index,
                        html: card.html.clone(),
                    })
                    .await;
            }
            Err(e) => {
                warn!(error = %e, "Card export failed");
                events
                    .emit(PipelineEvent::CardFailed {
                        index: e.index(),
                        reason: e.to_string(),
                    })
                    .await;
            }
        }
        results.push(result);
    }

    let report = CardExportReport { blocks, results };
    info!(
        completed = report.cards().count(),
        failed = report.failures().count(),
        "Card export finished"
    );
    Ok(report)
}

async fn stream_card(
    provider: &dyn GenerationProvider,
    design: &DesignDescriptor,
    system: &str,
    block: &MarkdownBlock,
    total: usize,
    events: &EventSink,
    cancel: &CancelToken,
) -> Result<Result<Card, CardExportError>, ForgeError> {
    let index = block.index;
    let request = GenerationRequest::text(
        prompts::card_prompt(&block.text, index + 1, total, design),
        system,
    );
    debug!(index, chars = block.text.len(), "Opening card stream");

    let mut fragments = match until_cancelled(cancel, provider.generate_streaming(&request)).await? {
        Ok(stream) => stream,
        Err(source) => return Ok(Err(CardExportError::Open { index, source })),
    };

    let mut card = Card::new(index, total);
    while let Some(item) = until_cancelled(cancel, fragments.next()).await? {
        match item {
            Ok(fragment) => {
                card.push_fragment(&fragment);
                events
                    .emit(PipelineEvent::CardToken {
                        index,
                        partial_html: card.html.clone(),
                    })
                    .await;
            }
            Err(source) => {
                return Ok(Err(CardExportError::Stream {
                    index,
                    received: card.html.len(),
                    source,
                }));
            }
        }
    }

    let html = finalize_fragment(&card.html);
    if html.is_empty() {
        return Ok(Err(CardExportError::Empty { index }));
    }
    card.finish(html);
    Ok(Ok(card))
}

#[cfg(test)]
mod tests {
    use super::*;
    use layoutforge_core::presets::default_design;
    use layoutforge_core::{channel, EventKind, ProviderError};
    use layoutforge_providers::{MockProvider, MockReply};

    async fn collect(mut rx: tokio::sync::mpsc::Receiver<PipelineEvent>) -> Vec<PipelineEvent> {
        let mut out = Vec::new();
        while let Some(e) = rx.recv().await {
            out.push(e);
        }
        out
    }

    #[test]
    fn finalize_cleans_and_inlines() {
        let raw = "```html\n<section class=\"p-4\"><p>a</p></section>\n<p>stray</p>\n```";
        assert_eq!(
            finalize_fragment(raw),
            "<section><section style=\"padding: 16px;\"><p>a</p></section>\n<p>stray</p></section>"
        );
        assert_eq!(finalize_fragment("```\n```"), "");
    }

    #[tokio::test]
    async fn three_blocks_make_three_ordered_cards() {
        let mock = MockProvider::new("mock").with_responder(|req| {
            let marker = if req.prompt.contains("# Title") {
                "title"
            } else if req.prompt.contains("Para one.") {
                "one"
            } else {
                "two"
            };
            MockReply::fragments(["<section class=\"p-2\">", marker, "</section>"])
        });
        let (sink, rx) = channel(Some(1024));
        let report = export_cards(
            &mock,
            &default_design(),
            "# Title\n\nPara one.\n\nPara two.",
            &sink,
            &CancelToken::new(),
        )
        .await
        .unwrap();
        drop(sink);

        assert_eq!(report.total(), 3);
        let cards: Vec<_> = report.cards().collect();
        assert_eq!(cards.len(), 3);
        assert!(cards.iter().all(|c| c.complete && c.total == 3));
        assert_eq!(cards[0].html, "<section style=\"padding: 8px;\">title</section>");
        assert_eq!(
            report.joined_html(),
            "<section style=\"padding: 8px;\">title</section>\n\
             <section style=\"padding: 8px;\">one</section>\n\
             <section style=\"padding: 8px;\">two</section>"
        );
        assert!(mock.requests()[1].prompt.contains("Card index: 2 of 3"));

        let events = collect(rx).await;
        let kinds: Vec<_> = events.iter().map(|e| e.kind()).collect();
        assert_eq!(kinds.iter().filter(|k| **k == EventKind::CardStarted).count(), 3);
        assert_eq!(kinds.iter().filter(|k| **k == EventKind::CardToken).count(), 9);
        let completed: Vec<_> = events
            .iter()
            .filter(|e| e.kind() == EventKind::CardCompleted)
            .map(|e| e.index())
            .collect();
        assert_eq!(completed, vec![Some(0), Some(1), Some(2)]);
        assert!(matches!(
            &events[2],
            PipelineEvent::CardToken { index: 0, partial_html } if partial_html == "<section class=\"p-2\">title"
        ));
    }

    #[tokio::test]
    async fn failing_card_does_not_stop_the_loop() {
        let mock = MockProvider::new("mock").with_replies([
            MockReply::text("<p>a</p>"),
            MockReply::FailMidStream {
                fragments: vec!["<p>half".into()],
                error: ProviderError::Unreachable {
                    provider: "mock".into(),
                    message: "reset".into(),
                },
            },
            MockReply::unreachable(),
            MockReply::text("```\n```"),
            MockReply::text("<p>e</p>"),
        ]);
        let (sink, rx) = channel(Some(1024));
        let report = export_cards(
            &mock,
            &default_design(),
            "a\n\nb\n\nc\n\nd\n\ne",
            &sink,
            &CancelToken::new(),
        )
        .await
        .unwrap();
        drop(sink);

        assert_eq!(report.joined_html(), "<p>a</p>\n<p>e</p>");
        let failures: Vec<_> = report.failures().collect();
        assert!(matches!(failures[0], CardExportError::Stream { index: 1, received: 7, .. }));
        assert!(matches!(failures[1], CardExportError::Open { index: 2, .. }));
        assert!(matches!(failures[2], CardExportError::Empty { index: 3 }));

        let failed: Vec<_> = collect(rx)
            .await
            .into_iter()
            .filter(|e| e.kind() == EventKind::CardFailed)
            .filter_map(|e| e.index())
            .collect();
        assert_eq!(failed, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn cancellation_mid_stream_aborts() {
        let mock = MockProvider::new("mock").with_fallback(MockReply::Hang);
        let cancel = CancelToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
            trigger.cancel();
        });
        let err = export_cards(&mock, &default_design(), "a", &EventSink::disabled(), &cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, ForgeError::Cancelled));
    }

    #[tokio::test]
    async fn empty_markdown_exports_nothing() {
        let mock = MockProvider::new("mock");
        let report = export_cards(&mock, &default_design(), "\n\n", &EventSink::disabled(), &CancelToken::new())
            .await
            .unwrap();
        assert_eq!(report.total(), 0);
        assert_eq!(report.joined_html(), "");
        assert_eq!(mock.call_count(), 0);
    }
}
