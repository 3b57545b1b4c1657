//! Generation backends.
//!
//! The configured [`ProviderKind`] picks the backend once, at construction;
//! the pipeline only ever sees `Arc<dyn GenerationProvider>`.

pub mod gemini;
mod http;
pub mod mock;
pub mod openai;
pub mod sse;

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use layoutforge_core::{GenerationProvider, ProviderConfig, ProviderError, ProviderKind};

pub use gemini::GeminiProvider;
pub use mock::{MockProvider, MockReply};
pub use openai::OpenAiProvider;
pub use sse::SseDecoder;

/// Build the backend selected by `config.kind`.
///
/// Credentials are not required here; each call checks them before touching
/// the network.
pub fn build_provider(config: &ProviderConfig) -> Result<Arc<dyn GenerationProvider>, ProviderError> {
    let request_timeout = Duration::from_secs(config.timeout_secs.max(1));
    let connect_timeout = Duration::from_secs(config.connect_timeout_secs.max(1));
    let settings = config.active().clone();
    info!(provider = %config.kind, model = %settings.model, "Using generation provider");

    let provider: Arc<dyn GenerationProvider> = match config.kind {
        ProviderKind::Gemini => Arc::new(GeminiProvider::new(settings, request_timeout, connect_timeout)?),
        ProviderKind::OpenAi => Arc::new(OpenAiProvider::new(settings, request_timeout, connect_timeout)?),
    };
    Ok(provider)
}
