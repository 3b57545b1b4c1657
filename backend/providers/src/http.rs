use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response};
use tracing::warn;

use layoutforge_core::{BackendSettings, ProviderError};

/// Shared HTTP client. Only the connect timeout is global; the request timeout
/// applies to single-shot calls so long streams are not cut off.
pub(crate) fn build_client(provider: &str, connect_timeout: Duration) -> Result<Client, ProviderError> {
    Client::builder()
        .connect_timeout(connect_timeout)
        .build()
        .map_err(|e| ProviderError::Client {
            provider: provider.to_string(),
            message: e.to_string(),
        })
}

pub(crate) fn require_key<'a>(provider: &str, settings: &'a BackendSettings) -> Result<&'a str, ProviderError> {
    settings
        .credential()
        .ok_or_else(|| ProviderError::MissingCredentials {
            provider: provider.to_string(),
        })
}

pub(crate) fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// Send the request and reject non-success statuses with their body.
pub(crate) async fn send(provider: &str, request: RequestBuilder) -> Result<Response, ProviderError> {
    let response = request.send().await.map_err(|e| ProviderError::Unreachable {
        provider: provider.to_string(),
        message: e.to_string(),
    })?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        warn!(provider, status = status.as_u16(), "backend returned an error status");
        return Err(ProviderError::Status {
            provider: provider.to_string(),
            status: status.as_u16(),
            body,
        });
    }
    Ok(response)
}

pub(crate) fn malformed(provider: &str, message: impl std::fmt::Display) -> ProviderError {
    ProviderError::Malformed {
        provider: provider.to_string(),
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_without_double_slashes() {
        assert_eq!(endpoint("http://h/v1/", "/chat/completions"), "http://h/v1/chat/completions");
        assert_eq!(endpoint("http://h/v1", "models/m:generateContent"), "http://h/v1/models/m:generateContent");
    }
}
