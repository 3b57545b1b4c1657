use tracing::{info, warn};

use layoutforge_core::{
    CancelToken, ChunkEnhancementError, EventSink, ForgeError, GenerationProvider, GenerationRequest,
    PipelineEvent, TextChunk,
};
use layoutforge_markdown::{chunk_by_size, unwrap_outer_fence};

use crate::guard::until_cancelled;
use crate::options::{tail_chars, PipelineOptions};
use crate::prompts;

/// Rewrite `full_text` chunk by chunk in the requested style.
///
/// Chunks are processed strictly in order, each seeing the tail of the last
/// successfully enhanced segment. A failed or empty chunk falls back to its
/// original text and does not update the context. A `ContentProgress` event
/// follows every chunk. Only cancellation aborts.
pub async fn enhance_content(
    provider: &dyn GenerationProvider,
    style_request: &str,
    full_text: &str,
    options: &PipelineOptions,
    events: &EventSink,
    cancel: &CancelToken,
) -> Result<String, ForgeError> {
    let chunks = chunk_by_size(full_text, options.chunk_size.max(1));
    let total = chunks.len();
    info!(chunks = total, chunk_size = options.chunk_size, "Enhancing content");

    let mut accumulated = String::new();
    let mut previous = String::new();
    let mut fallbacks = 0usize;

    for chunk in &chunks {
        let context = tail_chars(&previous, options.context_chars);
        let outcome = until_cancelled(
            cancel,
            enhance_chunk(provider, style_request, context, chunk),
        )
        .await?;

        let enhanced = match outcome {
            Ok(segment) => {
                accumulated.push_str(&segment);
                previous = segment;
                true
            }
            Err(e) => {
                warn!(error = %e, "Chunk enhancement failed; keeping original text");
                accumulated.push_str(&chunk.text);
                fallbacks += 1;
                false
            }
        };
        accumulated.push_str("\n\n");

        events
            .emit(PipelineEvent::ContentProgress {
                index: chunk.index,
                total,
                enhanced,
                accumulated: accumulated.clone(),
            })
            .await;
    }

    info!(chunks = total, fallbacks, "Content enhancement finished");
    Ok(accumulated)
}

async fn enhance_chunk(
    provider: &dyn GenerationProvider,
    style_request: &str,
    context: &str,
    chunk: &TextChunk,
) -> Result<String, ChunkEnhancementError> {
    let request = GenerationRequest::text(
        prompts::enhance_prompt(style_request, context, chunk.is_first(), &chunk.text),
        prompts::CONTENT_SYSTEM,
    );
    let raw = provider
        .generate(&request)
        .await
        .map_err(|source| ChunkEnhancementError::Provider {
            index: chunk.index,
            source,
        })?;
    let segment = unwrap_outer_fence(&raw);
    if segment.is_empty() {
        return Err(ChunkEnhancementError::Empty { index: chunk.index });
    }
    Ok(segment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use layoutforge_core::channel;
    use layoutforge_providers::{MockProvider, MockReply};

    fn small_chunks() -> PipelineOptions {
        PipelineOptions {
            chunk_size: 10,
            ..PipelineOptions::default()
        }
    }

    async fn drain(mut rx: tokio::sync::mpsc::Receiver<PipelineEvent>) -> Vec<PipelineEvent> {
        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            events.push(event);
        }
        events
    }

    #[tokio::test]
    async fn always_failing_provider_returns_original_chunks() {
        let mock = MockProvider::new("mock").with_fallback(MockReply::unreachable());
        let (sink, rx) = channel(None);
        let text = "abcdefghij\nklmno\nxyz";

        let out = enhance_content(&mock, "s", text, &small_chunks(), &sink, &CancelToken::new())
            .await
            .unwrap();
        drop(sink);

        let expected: String = chunk_by_size(text, 10)
            .into_iter()
            .map(|c| format!("{}\n\n", c.text))
            .collect();
        assert_eq!(out, expected);

        let events = drain(rx).await;
        assert_eq!(events.len(), 2);
        for (i, event) in events.iter().enumerate() {
            assert!(matches!(
                event,
                PipelineEvent::ContentProgress { index, total: 2, enhanced: false, .. } if *index == i
            ));
        }
        assert!(matches!(
            events.last(),
            Some(PipelineEvent::ContentProgress { accumulated, .. }) if *accumulated == out
        ));
    }

    #[tokio::test]
    async fn context_comes_from_last_successful_segment() {
        let mock = MockProvider::new("mock").with_replies([
            MockReply::text("```markdown\n## One\n```"),
            MockReply::text("   "),
            MockReply::text("## Three"),
        ]);
        let text = "abcdefghij\nklmnopqrst\nuvwxyz";

        let out = enhance_content(
            &mock,
            "style",
            text,
            &small_chunks(),
            &EventSink::disabled(),
            &CancelToken::new(),
        )
        .await
        .unwrap();
        assert_eq!(out, "## One\n\nklmnopqrst\n\n\n## Three\n\n");

        let requests = mock.requests();
        assert!(requests[0].prompt.contains("IS START OF DOCUMENT: true"));
        assert!(requests[0].prompt.contains("PREVIOUS CONTEXT (end of last segment): \"\""));
        assert!(requests[1].prompt.contains("\"## One\""));
        assert!(requests[1].prompt.contains("IS START OF DOCUMENT: false"));
        // The empty second answer leaves the context untouched.
        assert!(requests[2].prompt.contains("\"## One\""));
    }

    #[tokio::test]
    async fn context_is_truncated_to_tail() {
        let long = "y".repeat(500);
        let mock = MockProvider::new("mock").with_fallback(MockReply::text(long.clone()));
        let options = PipelineOptions {
            chunk_size: 10,
            context_chars: 300,
            ..PipelineOptions::default()
        };
        enhance_content(
            &mock,
            "s",
            "abcdefghij\nklmno",
            &options,
            &EventSink::disabled(),
            &CancelToken::new(),
        )
        .await
        .unwrap();
        let second = &mock.requests()[1].prompt;
        assert!(second.contains(&format!("\"{}\"", "y".repeat(300))));
        assert!(!second.contains(&"y".repeat(301)));
    }

    #[tokio::test]
    async fn cancellation_aborts_the_run() {
        let mock = MockProvider::new("mock").with_fallback(MockReply::Hang);
        let cancel = CancelToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
            trigger.cancel();
        });
        let err = enhance_content(&mock, "s", "text", &small_chunks(), &EventSink::disabled(), &cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, ForgeError::Cancelled));
    }

    #[tokio::test]
    async fn blank_input_makes_no_requests() {
        let mock = MockProvider::new("mock");
        let out = enhance_content(&mock, "s", " \n ", &small_chunks(), &EventSink::disabled(), &CancelToken::new())
            .await
            .unwrap();
        assert_eq!(out, "");
        assert_eq!(mock.call_count(), 0);
    }
}
