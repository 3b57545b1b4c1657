use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use layoutforge_core::{BackendSettings, FragmentStream, GenerationProvider, GenerationRequest, ProviderError};

use crate::http::{build_client, endpoint, malformed, require_key, send};
use crate::sse::{fragment_stream, Payload};

const NAME: &str = "openai";

/// OpenAI-compatible chat completions backend.
pub struct OpenAiProvider {
    client: Client,
    settings: BackendSettings,
    request_timeout: Duration,
}

impl OpenAiProvider {
    pub fn new(
        settings: BackendSettings,
        request_timeout: Duration,
        connect_timeout: Duration,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            client: build_client(NAME, connect_timeout)?,
            settings,
            request_timeout,
        })
    }

    fn body(&self, request: &GenerationRequest, stream: bool) -> ChatRequest {
        let mut messages = Vec::new();
        let system = system_content(request);
        if !system.is_empty() {
            messages.push(ChatMessage {
                role: "system".to_string(),
                content: Some(system),
            });
        }
        messages.push(ChatMessage {
            role: "user".to_string(),
            content: Some(request.prompt.clone()),
        });

        ChatRequest {
            model: self.settings.model.clone(),
            messages,
            response_format: request.response_is_json.then_some(ResponseFormat {
                kind: "json_object",
            }),
            stream,
        }
    }
}

/// `json_object` mode cannot carry a schema, so it rides in the system message.
fn system_content(request: &GenerationRequest) -> String {
    let schema = match (&request.response_schema, request.response_is_json) {
        (Some(schema), true) => schema,
        _ => return request.system_instruction.clone(),
    };
    let mut content = request.system_instruction.clone();
    if !content.is_empty() {
        content.push_str("\n\n");
    }
    content.push_str("Respond with one JSON object that conforms to this JSON schema:\n");
    content.push_str(&schema.to_string());
    content
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
    stream: bool,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Serialize, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    role: String,
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct StreamChunk {
    #[serde(default)]
    choices: Vec<StreamChoice>,
}

#[derive(Deserialize)]
struct StreamChoice {
    #[serde(default)]
    delta: Delta,
}

#[derive(Deserialize, Default)]
struct Delta {
    #[serde(default)]
    content: Option<String>,
}

fn parse_stream_event(data: &str) -> Result<Payload, ProviderError> {
    if data.trim() == "[DONE]" {
        return Ok(Payload::Done);
    }
    let chunk: StreamChunk = serde_json::from_str(data).map_err(|e| malformed(NAME, e))?;
    let text: String = chunk
        .choices
        .into_iter()
        .filter_map(|c| c.delta.content)
        .collect();
    Ok(if text.is_empty() {
        Payload::Skip
    } else {
        Payload::Fragment(text)
    })
}

#[async_trait]
impl GenerationProvider for OpenAiProvider {
    fn name(&self) -> &str {
        NAME
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, ProviderError> {
        let key = require_key(NAME, &self.settings)?;
        let start = Instant::now();
        debug!(
            model = %self.settings.model,
            json = request.response_is_json,
            prompt_chars = request.prompt.len(),
            "Sending request to OpenAI"
        );

        let builder = self
            .client
            .post(endpoint(&self.settings.base_url, "chat/completions"))
            .bearer_auth(key)
            .timeout(self.request_timeout)
            .json(&self.body(request, false));
        let response = send(NAME, builder).await?;
        let chat: ChatResponse = response.json().await.map_err(|e| malformed(NAME, e))?;

        debug!(latency_ms = start.elapsed().as_millis() as u64, "OpenAI responded");
        Ok(chat
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default())
    }

    async fn generate_streaming(
        &self,
        request: &GenerationRequest,
    ) -> Result<FragmentStream, ProviderError> {
        let key = require_key(NAME, &self.settings)?;
        debug!(model = %self.settings.model, "Opening OpenAI stream");

        let builder = self
            .client
            .post(endpoint(&self.settings.base_url, "chat/completions"))
            .bearer_auth(key)
            .json(&self.body(request, true));
        let response = send(NAME, builder).await?;
        Ok(fragment_stream(NAME, response, parse_stream_event))
    }
}
