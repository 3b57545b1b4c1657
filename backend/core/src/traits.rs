use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;

use crate::error::ProviderError;

/// Lazily produced text fragments of one streamed response.
///
/// Fragments arrive in generation order and concatenate to the full response.
/// The stream is finite and not restartable; dropping it closes the underlying
/// connection.
pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<String, ProviderError>> + Send>>;

/// Trait for text generation backends used by the pipeline.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Provider name (e.g., "gemini", "openai").
    fn name(&self) -> &str;

    /// Single-shot generation. Returns the whole response text.
    async fn generate(&self, request: &GenerationRequest) -> Result<String, ProviderError>;

    /// Token-streaming generation.
    async fn generate_streaming(
        &self,
        request: &GenerationRequest,
    ) -> Result<FragmentStream, ProviderError>;
}

/// Request to a generation provider.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub system_instruction: String,
    /// Constrain the backend to emit a JSON document.
    pub response_is_json: bool,
    /// Optional JSON schema for backends that support schema-constrained output.
    pub response_schema: Option<serde_json::Value>,
}

impl GenerationRequest {
    /// Free-form text request.
    pub fn text(prompt: impl Into<String>, system_instruction: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            system_instruction: system_instruction.into(),
            response_is_json: false,
            response_schema: None,
        }
    }

    /// JSON-mode request, optionally constrained by a schema.
    pub fn json(
        prompt: impl Into<String>,
        system_instruction: impl Into<String>,
        schema: Option<serde_json::Value>,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            system_instruction: system_instruction.into(),
            response_is_json: true,
            response_schema: schema,
        }
    }
}
