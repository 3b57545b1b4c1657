//! The top-level run: design, then content, then export.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

use layoutforge_core::{
    CancelToken, DesignDescriptor, EventSink, ForgeError, GenerationProvider, LayoutPreference,
    PipelineEvent,
};

use crate::design::{request_design, variations};
use crate::enhance::enhance_content;
use crate::export::{export_document, ExportArtifact};
use crate::guard::until_cancelled;
use crate::options::{head_chars, PipelineOptions};

/// Result of a generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationOutcome {
    pub design: DesignDescriptor,
    /// Enhanced markdown, ready for export.
    pub content: String,
}

/// Runs every stage against one provider, reporting through one event sink.
pub struct LayoutPipeline {
    provider: Arc<dyn GenerationProvider>,
    options: PipelineOptions,
    events: EventSink,
    cancel: CancelToken,
}

impl LayoutPipeline {
    pub fn new(provider: Arc<dyn GenerationProvider>) -> Self {
        Self {
            provider,
            options: PipelineOptions::default(),
            events: EventSink::disabled(),
            cancel: CancelToken::new(),
        }
    }

    pub fn with_options(mut self, options: PipelineOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_events(mut self, events: EventSink) -> Self {
        self.events = events;
        self
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Token that aborts whatever stage is running.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Produce a design and the enhanced content.
    ///
    /// With `existing` set, design generation is skipped and that descriptor
    /// is reused. A design failure aborts the run before any enhancement.
    #[instrument(skip_all, fields(provider = self.provider.name(), %layout))]
    pub async fn generate(
        &self,
        style_request: &str,
        content: &str,
        layout: LayoutPreference,
        existing: Option<DesignDescriptor>,
    ) -> Result<GenerationOutcome, ForgeError> {
        let design = match existing {
            Some(design) => {
                info!(theme = %design.theme_name, "Reusing selected design");
                design
            }
            None => {
                let sample = head_chars(content, self.options.sample_chars);
                let generated = until_cancelled(
                    &self.cancel,
                    request_design(self.provider.as_ref(), style_request, sample, &layout, None),
                )
                .await?;
                generated.map_err(|e| {
                    error!(error = %e, "Design generation failed; aborting run");
                    ForgeError::Design(e)
                })?
            }
        };

        self.events
            .emit(PipelineEvent::DesignReady {
                design: design.clone(),
            })
            .await;

        let content = enhance_content(
            self.provider.as_ref(),
            style_request,
            content,
            &self.options,
            &self.events,
            &self.cancel,
        )
        .await?;

        info!(bytes = content.len(), "Generation run finished");
        Ok(GenerationOutcome { design, content })
    }

    /// Generate `count` alternative designs without touching the content.
    #[instrument(skip_all, fields(provider = self.provider.name(), count = count))]
    pub async fn design_variations(
        &self,
        style_request: &str,
        content: &str,
        layout: LayoutPreference,
        count: usize,
    ) -> Result<Vec<DesignDescriptor>, ForgeError> {
        let sample = head_chars(content, self.options.sample_chars);
        let designs = until_cancelled(
            &self.cancel,
            variations(self.provider.as_ref(), style_request, sample, &layout, count),
        )
        .await??;
        Ok(designs)
    }

    /// Export styled markdown with the configured card failure policy.
    #[instrument(skip_all, fields(provider = self.provider.name(), theme = %design.theme_name))]
    pub async fn export(
        &self,
        design: &DesignDescriptor,
        markdown: &str,
    ) -> Result<ExportArtifact, ForgeError> {
        export_document(
            self.provider.as_ref(),
            design,
            markdown,
            self.options.card_failure,
            &self.events,
            &self.cancel,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use layoutforge_core::presets::{default_design, design_preset};
    use layoutforge_core::{channel, CardFailurePolicy, DesignGenerationError, EventKind};
    use layoutforge_providers::{MockProvider, MockReply};

    const DESIGN_JSON: &str = r##"{"themeName":"Ink","layoutType":"card","pageBackground":"bg-stone-100",
        "containerBackground":"bg-white","heading2":"text-xl font-bold","textColor":"text-stone-800",
        "highlightColor":"#1c1917"}"##;

    fn pipeline(mock: MockProvider) -> (Arc<MockProvider>, LayoutPipeline) {
        let mock = Arc::new(mock);
        let pipeline = LayoutPipeline::new(mock.clone());
        (mock, pipeline)
    }

    #[tokio::test]
    async fn generate_emits_design_before_content() {
        let (mock, pipeline) = pipeline(MockProvider::new("mock").with_replies([
            MockReply::text(DESIGN_JSON),
            MockReply::text("# Better"),
        ]));
        let (sink, mut rx) = channel(None);
        let pipeline = pipeline.with_events(sink);

        let outcome = pipeline
            .generate("ink wash", "plain words", LayoutPreference::Auto, None)
            .await
            .unwrap();
        drop(pipeline);

        assert_eq!(outcome.design.theme_name, "Ink");
        assert_eq!(outcome.content, "# Better\n\n");
        assert_eq!(mock.call_count(), 2);

        assert_eq!(rx.recv().await.unwrap().kind(), EventKind::DesignReady);
        assert_eq!(rx.recv().await.unwrap().kind(), EventKind::ContentProgress);
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn design_failure_aborts_before_enhancement() {
        let (mock, pipeline) = pipeline(MockProvider::new("mock").with_reply(MockReply::text("nope")));
        let err = pipeline
            .generate("s", "content", LayoutPreference::Auto, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ForgeError::Design(DesignGenerationError::Parse(_))));
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn existing_design_skips_generation() {
        let (mock, pipeline) = pipeline(MockProvider::new("mock").with_reply(MockReply::text("rewritten")));
        let tech = design_preset("tech").unwrap();
        let outcome = pipeline
            .generate("s", "content", LayoutPreference::Auto, Some(tech.clone()))
            .await
            .unwrap();
        assert_eq!(outcome.design, tech);
        assert_eq!(mock.call_count(), 1);
        assert!(!mock.requests()[0].response_is_json);
    }

    #[tokio::test]
    async fn sample_size_follows_options() {
        let (mock, pipeline) = pipeline(MockProvider::new("mock").with_reply(MockReply::text(DESIGN_JSON)));
        let pipeline = pipeline.with_options(PipelineOptions {
            sample_chars: 5,
            ..PipelineOptions::default()
        });
        pipeline
            .generate("s", "abcdefghij", LayoutPreference::Auto, None)
            .await
            .unwrap();
        let prompt = &mock.requests()[0].prompt;
        assert!(prompt.contains("abcde\n"));
        assert!(!prompt.contains("abcdef"));
    }

    #[tokio::test]
    async fn end_to_end_export_keeps_block_order() {
        let mock = MockProvider::new("mock").with_responder(|req| {
            if req.prompt.contains("Build the page shell") {
                return MockReply::text("<article class=\"mx-auto\">{{CONTENT}}</article>");
            }
            let body = ["# Title", "Para one.", "Para two."]
                .iter()
                .find(|b| req.prompt.contains(&format!("---\n{b}\n---")))
                .map_or("?", |b| b.trim_start_matches("# "));
            MockReply::fragments(["<section class=\"p-4\">", body, "</section>"])
        });
        let (mock, pipeline) = pipeline(mock);
        let (sink, mut rx) = channel(Some(1024));
        let pipeline = pipeline
            .with_events(sink)
            .with_options(PipelineOptions {
                card_failure: CardFailurePolicy::Skip,
                ..PipelineOptions::default()
            });

        let artifact = pipeline
            .export(&default_design(), "# Title\n\nPara one.\n\nPara two.")
            .await
            .unwrap();
        drop(pipeline);

        assert_eq!(mock.call_count(), 4);
        assert_eq!(artifact.cards.len(), 3);
        let indices: Vec<_> = artifact.cards.iter().map(|c| c.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(
            artifact.html,
            "<article style=\"margin-left: auto; margin-right: auto;\">\
             <section style=\"padding: 16px;\">Title</section>\n\
             <section style=\"padding: 16px;\">Para one.</section>\n\
             <section style=\"padding: 16px;\">Para two.</section></article>"
        );

        let mut completed = Vec::new();
        while let Some(event) = rx.recv().await {
            if let PipelineEvent::CardCompleted { index, .. } = event {
                completed.push(index);
            }
        }
        assert_eq!(completed, vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn cancelled_token_stops_every_stage() {
        let (mock, pipeline) = pipeline(MockProvider::new("mock"));
        pipeline.cancel_token().cancel();
        let err = pipeline
            .generate("s", "c", LayoutPreference::Auto, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ForgeError::Cancelled));
        let err = pipeline.export(&default_design(), "a").await.unwrap_err();
        assert!(matches!(err, ForgeError::Cancelled));
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn variations_go_through_the_pipeline() {
        let (_, pipeline) = pipeline(
            MockProvider::new("mock").with_replies([MockReply::unreachable(), MockReply::text(DESIGN_JSON)]),
        );
        let designs = pipeline
            .design_variations("s", "c", LayoutPreference::Auto, 2)
            .await
            .unwrap();
        assert_eq!(designs.len(), 1);
    }
}
