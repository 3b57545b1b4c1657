//! Safe-to-display config snapshots with secrets masked.

use serde_json::Value;

const SENSITIVE_KEYS: &[&str] = &[
    "apiKey",
    "api_key",
    "apikey",
    "token",
    "accessToken",
    "access_token",
    "secret",
    "password",
];

/// Mask every sensitive string field, keeping a four-character hint.
///
/// Unresolved `${VAR}` references are shown as they are since they hold no secret.
pub fn redact(value: &Value) -> Value {
    redact_recursive(value, "")
}

fn is_sensitive_key(key: &str) -> bool {
    SENSITIVE_KEYS.iter().any(|k| k.eq_ignore_ascii_case(key))
}

fn mask(s: &str) -> String {
    if s.chars().count() > 8 {
        format!("{}***", s.chars().take(4).collect::<String>())
    } else {
        "***".to_string()
    }
}

fn redact_recursive(value: &Value, key: &str) -> Value {
    match value {
        Value::String(s)
            if is_sensitive_key(key) && !s.is_empty() && !crate::contains_env_var_reference(s) =>
        {
            Value::String(mask(s))
        }
        Value::Array(arr) => Value::Array(arr.iter().map(|v| redact_recursive(v, key)).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), redact_recursive(v, k)))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// Paths of the fields [`redact`] would mask.
pub fn collect_redacted_paths(value: &Value) -> Vec<String> {
    let mut paths = Vec::new();
    collect_paths_recursive(value, "", &mut paths);
    paths
}

fn collect_paths_recursive(value: &Value, path: &str, out: &mut Vec<String>) {
    match value {
        Value::String(s) if !s.is_empty() => {
            let key = path.rsplit('.').next().unwrap_or("");
            if is_sensitive_key(key) && !crate::contains_env_var_reference(s) {
                out.push(path.to_string());
            }
        }
        Value::Array(arr) => {
            for (i, v) in arr.iter().enumerate() {
                collect_paths_recursive(v, &format!("{path}[{i}]"), out);
            }
        }
        Value::Object(map) => {
            for (k, v) in map {
                let child_path = if path.is_empty() {
                    k.clone()
                } else {
                    format!("{path}.{k}")
                };
                collect_paths_recursive(v, &child_path, out);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn masks_api_keys_with_hint() {
        let v = json!({"provider": {"openai": {"apiKey": "sk-abcdef123456", "model": "gpt-4o"}}});
        let redacted = redact(&v);
        assert_eq!(redacted["provider"]["openai"]["apiKey"], "sk-a***");
        assert_eq!(redacted["provider"]["openai"]["model"], "gpt-4o");
        assert_eq!(collect_redacted_paths(&v), vec!["provider.openai.apiKey"]);
    }

    #[test]
    fn short_secrets_are_fully_masked() {
        let redacted = redact(&json!({"apiKey": "abc"}));
        assert_eq!(redacted["apiKey"], "***");
    }

    #[test]
    fn env_references_are_left_visible() {
        let v = json!({"gemini": {"apiKey": "${GEMINI_API_KEY}"}});
        assert_eq!(redact(&v), v);
        assert!(collect_redacted_paths(&v).is_empty());
    }
}
