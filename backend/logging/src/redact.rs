//! Log Redaction Layer
//!
//! Scrubs API keys and bearer tokens from strings prior to logging.

use regex::Regex;
use std::sync::LazyLock;

static API_KEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(sk-[a-zA-Z0-9_\-]{16,})|(AIza[0-9A-Za-z_\-]{35})|(Bearer\s+[a-zA-Z0-9\-\._~+/]+=*)").unwrap()
});
static KEY_PARAM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)((?:api[_-]?key|x-goog-api-key)[=:]\s*)[^\s&,]+").unwrap());

/// Redacts sensitive patterns in a string.
pub fn redact_sensitive_data(input: &str) -> String {
    let redacted = API_KEY_RE.replace_all(input, "[REDACTED_TOKEN]");
    KEY_PARAM_RE
        .replace_all(&redacted, "${1}[REDACTED_TOKEN]")
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scrubs_keys_and_bearer_tokens() {
        let raw = "POST with Bearer eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9 using sk-proj-abcdefghijklmnop1234";
        let clean = redact_sensitive_data(raw);
        assert!(!clean.contains("eyJhbGci"));
        assert!(!clean.contains("abcdefghijklmnop"));
        assert_eq!(clean.matches("[REDACTED_TOKEN]").count(), 2);
    }

    #[test]
    fn scrubs_key_parameters() {
        let clean = redact_sensitive_data("url?alt=sse&key=secret123 x-goog-api-key: abc");
        assert_eq!(clean, "url?alt=sse&key=secret123 x-goog-api-key: [REDACTED_TOKEN]");
        assert_eq!(redact_sensitive_data("api_key=zzz&x=1"), "api_key=[REDACTED_TOKEN]&x=1");
    }

    #[test]
    fn leaves_plain_text_alone() {
        assert_eq!(redact_sensitive_data("card 3 failed: 503"), "card 3 failed: 503");
    }
}
