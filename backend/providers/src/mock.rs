use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures::stream;

use layoutforge_core::{FragmentStream, GenerationProvider, GenerationRequest, ProviderError};

/// One scripted answer of a [`MockProvider`].
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Whole response; streamed as a single fragment.
    Text(String),
    /// Streamed fragment by fragment; concatenated for single-shot calls.
    Fragments(Vec<String>),
    /// The call fails before any output.
    Fail(ProviderError),
    /// The stream yields `fragments`, then fails. Single-shot calls fail.
    FailMidStream {
        fragments: Vec<String>,
        error: ProviderError,
    },
    /// Never answers. Used to exercise cancellation.
    Hang,
}

impl MockReply {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn fragments<I, S>(fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Fragments(fragments.into_iter().map(Into::into).collect())
    }

    pub fn unreachable() -> Self {
        Self::Fail(ProviderError::Unreachable {
            provider: "mock".into(),
            message: "scripted failure".into(),
        })
    }
}

type Responder = dyn Fn(&GenerationRequest) -> MockReply + Send + Sync;

/// A scripted provider for tests and offline runs.
///
/// Replies are taken from the queue in call order; when the queue is empty the
/// responder (if any) decides, then the fallback reply. Every request is
/// recorded.
pub struct MockProvider {
    name: String,
    replies: Mutex<VecDeque<MockReply>>,
    responder: Option<Arc<Responder>>,
    fallback: MockReply,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl MockProvider {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            replies: Mutex::new(VecDeque::new()),
            responder: None,
            fallback: MockReply::text("Mock response"),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_reply(self, reply: MockReply) -> Self {
        self.replies
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(reply);
        self
    }

    pub fn with_replies(self, replies: impl IntoIterator<Item = MockReply>) -> Self {
        self.replies
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .extend(replies);
        self
    }

    pub fn with_responder<F>(mut self, responder: F) -> Self
    where
        F: Fn(&GenerationRequest) -> MockReply + Send + Sync + 'static,
    {
        self.responder = Some(Arc::new(responder));
        self
    }

    pub fn with_fallback(mut self, reply: MockReply) -> Self {
        self.fallback = reply;
        self
    }

    /// Requests received so far, in call order.
    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    fn next_reply(&self, request: &GenerationRequest) -> MockReply {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request.clone());
        if let Some(reply) = self
            .replies
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
        {
            return reply;
        }
        match &self.responder {
            Some(responder) => responder(request),
            None => self.fallback.clone(),
        }
    }
}

#[async_trait]
impl GenerationProvider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, ProviderError> {
        match self.next_reply(request) {
            MockReply::Text(text) => Ok(text),
            MockReply::Fragments(fragments) => Ok(fragments.concat()),
            MockReply::Fail(error) | MockReply::FailMidStream { error, .. } => Err(error),
            MockReply::Hang => futures::future::pending().await,
        }
    }

    async fn generate_streaming(
        &self,
        request: &GenerationRequest,
    ) -> Result<FragmentStream, ProviderError> {
        let items: Vec<Result<String, ProviderError>> = match self.next_reply(request) {
            MockReply::Text(text) => vec![Ok(text)],
            MockReply::Fragments(fragments) => fragments.into_iter().map(Ok).collect(),
            MockReply::Fail(error) => return Err(error),
            MockReply::FailMidStream { fragments, error } => fragments
                .into_iter()
                .map(Ok)
                .chain(std::iter::once(Err(error)))
                .collect(),
            MockReply::Hang => {
                return Ok(Box::pin(stream::pending::<Result<String, ProviderError>>()));
            }
        };
        Ok(Box::pin(stream::iter(items)))
    }
}
