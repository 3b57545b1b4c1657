use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use layoutforge_core::{BackendSettings, FragmentStream, GenerationProvider, GenerationRequest, ProviderError};

use crate::http::{build_client, endpoint, malformed, require_key, send};
use crate::sse::{fragment_stream, Payload};

const NAME: &str = "gemini";

/// Google Gemini `generateContent` backend.
pub struct GeminiProvider {
    client: Client,
    settings: BackendSettings,
    request_timeout: Duration,
}

impl GeminiProvider {
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

    fn url(&self, method: &str) -> String {
        endpoint(
            &self.settings.base_url,
            &format!("models/{}:{method}", self.settings.model),
        )
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateBody {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Serialize, Deserialize, Default)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<Value>,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Content,
}

impl GenerateResponse {
    /// Text of the first candidate, all parts concatenated.
    fn text(&self) -> String {
        self.candidates
            .first()
            .map(|c| {
                c.content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

fn build_body(request: &GenerationRequest) -> GenerateBody {
    let text_content = |role: Option<&str>, text: &str| Content {
        role: role.map(str::to_string),
        parts: vec![Part {
            text: Some(text.to_string()),
        }],
    };
    GenerateBody {
        contents: vec![text_content(Some("user"), &request.prompt)],
        system_instruction: (!request.system_instruction.is_empty())
            .then(|| text_content(None, &request.system_instruction)),
        generation_config: request.response_is_json.then(|| GenerationConfig {
            response_mime_type: "application/json",
            response_schema: request.response_schema.as_ref().map(gemini_schema),
        }),
    }
}

/// Gemini expects upper-case OpenAPI type names (`STRING`, `OBJECT`).
fn gemini_schema(schema: &Value) -> Value {
    match schema {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, value)| {
                    let value = match (key.as_str(), value) {
                        ("type", Value::String(t)) => Value::String(t.to_ascii_uppercase()),
                        _ => gemini_schema(value),
                    };
                    (key.clone(), value)
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(gemini_schema).collect()),
        other => other.clone(),
    }
}

fn parse_stream_event(data: &str) -> Result<Payload, ProviderError> {
    let chunk: GenerateResponse = serde_json::from_str(data).map_err(|e| malformed(NAME, e))?;
    let text = chunk.text();
    Ok(if text.is_empty() {
        Payload::Skip
    } else {
        Payload::Fragment(text)
    })
}

#[async_trait]
impl GenerationProvider for GeminiProvider {
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
            "Sending request to Gemini"
        );

        let builder = self
            .client
            .post(self.url("generateContent"))
            .header("x-goog-api-key", key)
            .timeout(self.request_timeout)
            .json(&build_body(request));
        let response = send(NAME, builder).await?;
        let body: GenerateResponse = response.json().await.map_err(|e| malformed(NAME, e))?;

        debug!(latency_ms = start.elapsed().as_millis() as u64, "Gemini responded");
        Ok(body.text())
    }

    async fn generate_streaming(
        &self,
        request: &GenerationRequest,
    ) -> Result<FragmentStream, ProviderError> {
        let key = require_key(NAME, &self.settings)?;
        debug!(model = %self.settings.model, "Opening Gemini stream");

        let builder = self
            .client
            .post(self.url("streamGenerateContent"))
            .query(&[("alt", "sse")])
            .header("x-goog-api-key", key)
            .json(&build_body(request));
        let response = send(NAME, builder).await?;
        Ok(fragment_stream(NAME, response, parse_stream_event))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use httpmock::MockServer;
    use serde_json::json;

    fn provider(server: &MockServer, key: Option<&str>) -> GeminiProvider {
        let settings = BackendSettings {
            api_key: key.map(str::to_string),
            model: "test-model".into(),
            base_url: server.base_url(),
        };
        GeminiProvider::new(settings, Duration::from_secs(5), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn generate_sends_json_mode_and_schema() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method("POST")
                    .path("/models/test-model:generateContent")
                    .header("x-goog-api-key", "k")
                    .json_body_includes(
                        r#"{"generationConfig":{"responseMimeType":"application/json","responseSchema":{"type":"OBJECT"}},"systemInstruction":{"parts":[{"text":"sys"}]}}"#,
                    );
                then.status(200)
                    .header("content-type", "application/json")
                    .body(r#"{"candidates":[{"content":{"parts":[{"text":"{\"a\":"},{"text":"1}"}]}}]}"#);
            })
            .await;

        let request = GenerationRequest::json("prompt", "sys", Some(json!({"type": "object"})));
        let text = provider(&server, Some("k")).generate(&request).await.unwrap();
        assert_eq!(text, r#"{"a":1}"#);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn streaming_yields_fragments_in_order() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method("POST")
                    .path("/models/test-model:streamGenerateContent")
                    .query_param("alt", "sse");
                then.status(200)
                    .header("content-type", "text/event-stream")
                    .body(concat!(
                        "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"<section>\"}]}}]}\r\n\r\n",
                        "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"hi\"}]}}]}\r\n\r\n",
                        "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"</section>\"}]}}]}\r\n\r\n",
                    ));
            })
            .await;

        let stream = provider(&server, Some("k"))
            .generate_streaming(&GenerationRequest::text("p", "s"))
            .await
            .unwrap();
        let fragments: Vec<String> = stream.map(Result::unwrap).collect().await;
        assert_eq!(fragments, vec!["<section>", "hi", "</section>"]);
    }

    #[tokio::test]
    async fn error_status_is_reported() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method("POST");
                then.status(429).body("quota exceeded");
            })
            .await;

        let err = provider(&server, Some("k"))
            .generate(&GenerationRequest::text("p", "s"))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ProviderError::Status {
                provider: "gemini".into(),
                status: 429,
                body: "quota exceeded".into()
            }
        );
    }

    #[tokio::test]
    async fn missing_key_fails_before_any_request() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method("POST");
                then.status(200);
            })
            .await;

        let p = provider(&server, None);
        let err = p.generate(&GenerationRequest::text("p", "s")).await.unwrap_err();
        assert!(matches!(err, ProviderError::MissingCredentials { .. }));
        assert!(p.generate_streaming(&GenerationRequest::text("p", "s")).await.is_err());
        assert_eq!(mock.hits_async().await, 0);
    }

    #[test]
    fn schema_types_are_uppercased() {
        let schema = json!({
            "type": "object",
            "properties": {"layoutType": {"type": "string", "enum": ["card"]}},
        });
        assert_eq!(
            gemini_schema(&schema),
            json!({
                "type": "OBJECT",
                "properties": {"layoutType": {"type": "STRING", "enum": ["card"]}},
            })
        );
    }
}
