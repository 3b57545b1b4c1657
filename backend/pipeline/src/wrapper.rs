use tracing::{info, warn};

use layoutforge_core::{
    CancelToken, DesignDescriptor, EventSink, ForgeError, GenerationProvider, GenerationRequest,
    PipelineEvent, WrapperGenerationError,
};
use layoutforge_markdown::strip_code_fences;
use layoutforge_style::{markup_spans, rewrite_markup, sanitize_fragment};

use crate::guard::until_cancelled;
use crate::prompts::{self, PLACEHOLDER};

/// Shell used when no usable wrapper comes back from the model.
pub const FALLBACK_TEMPLATE: &str = "<section>{{CONTENT}}</section>";

/// Outer page shell holding [`PLACEHOLDER`] exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrapperTemplate {
    pub html: String,
    /// True when `html` is [`FALLBACK_TEMPLATE`] because generation failed.
    pub fallback: bool,
}

impl WrapperTemplate {
    pub fn fallback() -> Self {
        Self {
            html: FALLBACK_TEMPLATE.to_string(),
            fallback: true,
        }
    }

    /// Substitute the card markup for the placeholder.
    pub fn compose(&self, content: &str) -> String {
        self.html.replacen(PLACEHOLDER, content, 1)
    }
}

/// Generate the page shell that surrounds the exported cards.
///
/// Provider failures and unusable responses degrade to
/// [`FALLBACK_TEMPLATE`] with a `WrapperFallback` event. Only cancellation
/// is returned as an error.
pub async fn generate_wrapper(
    provider: &dyn GenerationProvider,
    design: &DesignDescriptor,
    events: &EventSink,
    cancel: &CancelToken,
) -> Result<WrapperTemplate, ForgeError> {
    let request = GenerationRequest::text(prompts::wrapper_prompt(design), prompts::wrapper_system());
    let outcome = until_cancelled(cancel, provider.generate(&request)).await?;

    let processed = outcome
        .map_err(WrapperGenerationError::from)
        .and_then(|raw| post_process_wrapper(&raw));

    match processed {
        Ok(html) => {
            info!(bytes = html.len(), "Wrapper generated");
            Ok(WrapperTemplate {
                html,
                fallback: false,
            })
        }
        Err(e) => {
            warn!(error = %e, "Wrapper generation failed; using fallback shell");
            events
                .emit(PipelineEvent::WrapperFallback {
                    reason: e.to_string(),
                })
                .await;
            Ok(WrapperTemplate::fallback())
        }
    }
}

/// Clean a raw wrapper answer and pin the placeholder to exactly one occurrence.
pub fn post_process_wrapper(raw: &str) -> Result<String, WrapperGenerationError> {
    let html = sanitize_fragment(&strip_code_fences(raw));
    let html = html.trim();
    if html.is_empty() {
        return Err(WrapperGenerationError::Empty);
    }

    let html = single_placeholder(&rewrite_markup(html));
    if html.matches(PLACEHOLDER).count() != 1 {
        return Err(WrapperGenerationError::PlaceholderLost);
    }
    Ok(html)
}

/// Keep the first placeholder that sits in text content and drop the rest.
/// Without one, the placeholder goes before the last closing tag, or at the
/// end when there is none.
fn single_placeholder(html: &str) -> String {
    let spans = markup_spans(html);
    let in_text = html
        .match_indices(PLACEHOLDER)
        .map(|(i, _)| i)
        .find(|i| !spans.iter().any(|span| span.contains(i)));

    if let Some(keep) = in_text {
        let head = &html[..keep];
        let tail = &html[keep + PLACEHOLDER.len()..];
        return format!(
            "{}{PLACEHOLDER}{}",
            head.replace(PLACEHOLDER, ""),
            tail.replace(PLACEHOLDER, "")
        );
    }

    let html = html.replace(PLACEHOLDER, "");
    let last_close = markup_spans(&html)
        .into_iter()
        .rev()
        .find(|span| html[span.clone()].starts_with("</"));
    match last_close {
        Some(span) => format!("{}{PLACEHOLDER}{}", &html[..span.start], &html[span.start..]),
        None => format!("{html}{PLACEHOLDER}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use layoutforge_core::presets::default_design;
    use layoutforge_core::{channel, EventKind};
    use layoutforge_providers::{MockProvider, MockReply};

    #[test]
    fn placeholder_is_inserted_before_last_closing_tag() {
        assert_eq!(
            post_process_wrapper("<section><header>Top</header></section>").unwrap(),
            "<section><header>Top</header>{{CONTENT}}</section>"
        );
        assert_eq!(post_process_wrapper("plain shell").unwrap(), "plain shell{{CONTENT}}");
    }

    #[test]
    fn duplicate_placeholders_are_removed() {
        let out = post_process_wrapper("<div>{{CONTENT}}<p>{{CONTENT}}</p>{{CONTENT}}</div>").unwrap();
        assert_eq!(out, "<div>{{CONTENT}}<p></p></div>");
    }

    #[test]
    fn wrapper_is_fenced_sanitized_and_inlined() {
        let raw = "```html\n<section class=\"p-4\" onclick=\"x()\"><script>bad()</script>{{CONTENT}}</section>\n```";
        assert_eq!(
            post_process_wrapper(raw).unwrap(),
            "<section style=\"padding: 16px;\">{{CONTENT}}</section>"
        );
    }

    #[test]
    fn placeholder_outside_text_content_is_moved() {
        assert_eq!(
            post_process_wrapper("<div class=\"{{CONTENT}}\"></div>").unwrap(),
            "<div>{{CONTENT}}</div>"
        );
        assert_eq!(
            post_process_wrapper("<div title=\"{{CONTENT}}\"><!-- </x> --></div>").unwrap(),
            "<div title=\"\"><!-- </x> -->{{CONTENT}}</div>"
        );
        assert_eq!(
            post_process_wrapper("<div title=\"{{CONTENT}}\"><p>{{CONTENT}}</p></div>").unwrap(),
            "<div title=\"\"><p>{{CONTENT}}</p></div>"
        );
    }

    #[test]
    fn blank_wrapper_is_empty() {
        assert!(matches!(
            post_process_wrapper("```\n```").unwrap_err(),
            WrapperGenerationError::Empty
        ));
    }

    #[test]
    fn compose_substitutes_once() {
        let template = WrapperTemplate::fallback();
        assert_eq!(template.compose("<p>a</p>"), "<section><p>a</p></section>");
        assert_eq!(template.compose("{{CONTENT}}"), "<section>{{CONTENT}}</section>");
    }

    #[tokio::test]
    async fn provider_failure_falls_back_with_event() {
        let mock = MockProvider::new("mock").with_reply(MockReply::unreachable());
        let (sink, mut rx) = channel(None);
        let wrapper = generate_wrapper(&mock, &default_design(), &sink, &CancelToken::new())
            .await
            .unwrap();
        drop(sink);
        assert_eq!(wrapper, WrapperTemplate::fallback());
        let event = rx.recv().await.unwrap();
        assert_eq!(event.kind(), EventKind::WrapperFallback);
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn generated_wrapper_keeps_placeholder() {
        let mock = MockProvider::new("mock")
            .with_reply(MockReply::text("<section class=\"bg-white\"><h1>Hi</h1></section>"));
        let wrapper = generate_wrapper(&mock, &default_design(), &EventSink::disabled(), &CancelToken::new())
            .await
            .unwrap();
        assert!(!wrapper.fallback);
        assert_eq!(
            wrapper.html,
            "<section style=\"background-color: #ffffff;\"><h1>Hi</h1>{{CONTENT}}</section>"
        );
        let request = &mock.requests()[0];
        assert!(!request.response_is_json);
        assert!(request.prompt.contains("\"themeName\""));
    }

    #[tokio::test]
    async fn cancellation_propagates() {
        let mock = MockProvider::new("mock").with_fallback(MockReply::Hang);
        let cancel = CancelToken::new();
        cancel.cancel();
        let err = generate_wrapper(&mock, &default_design(), &EventSink::disabled(), &cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, ForgeError::Cancelled));
    }
}
