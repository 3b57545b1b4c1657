//! Environment variable handling for config values.
//!
//! `${VAR_NAME}` in any string value is replaced at load time; only uppercase
//! `[A-Z_][A-Z0-9_]*` names are matched. `$${VAR_NAME}` yields a literal
//! `${VAR_NAME}`. Separately, a fixed set of variables can override provider
//! settings through [`apply_env_overrides`].

use anyhow::{bail, Result};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

use layoutforge_core::ProviderKind;

use crate::schema::{BackendSection, LayoutForgeConfig, ProviderSection};

/// A reference, optionally escaped by a leading extra `$`.
static ENV_VAR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$?\$\{([A-Z_][A-Z0-9_]*)\}").unwrap());

pub const PROVIDER_VAR: &str = "LAYOUTFORGE_PROVIDER";
pub const GEMINI_API_KEY_VAR: &str = "GEMINI_API_KEY";
pub const GEMINI_MODEL_VAR: &str = "GEMINI_MODEL";
pub const OPENAI_API_KEY_VAR: &str = "OPENAI_API_KEY";
pub const OPENAI_BASE_URL_VAR: &str = "OPENAI_BASE_URL";
pub const OPENAI_MODEL_VAR: &str = "OPENAI_MODEL";

#[derive(Debug, thiserror::Error)]
#[error("Missing env var \"{var_name}\" referenced at config path: {config_path}")]
pub struct MissingEnvVarError {
    pub var_name: String,
    pub config_path: String,
}

/// Snapshot of the process environment, taken once at the edge.
pub fn process_env() -> HashMap<String, String> {
    std::env::vars().collect()
}

/// Substitute `${VAR}` references across a config value tree.
///
/// Fails on the first reference whose variable is unset or empty.
pub fn resolve_env_vars(value: &Value, env: &HashMap<String, String>) -> Result<Value> {
    substitute_value(value, env, "")
}

fn substitute_value(value: &Value, env: &HashMap<String, String>, path: &str) -> Result<Value> {
    match value {
        Value::String(s) => Ok(Value::String(substitute_string(s, env, path)?)),
        Value::Array(arr) => arr
            .iter()
            .enumerate()
            .map(|(i, v)| substitute_value(v, env, &format!("{path}[{i}]")))
            .collect::<Result<Vec<_>>>()
            .map(Value::Array),
        Value::Object(map) => {
            let mut result = serde_json::Map::new();
            for (k, v) in map {
                let child_path = if path.is_empty() {
                    k.clone()
                } else {
                    format!("{path}.{k}")
                };
                result.insert(k.clone(), substitute_value(v, env, &child_path)?);
            }
            Ok(Value::Object(result))
        }
        other => Ok(other.clone()),
    }
}

fn substitute_string(s: &str, env: &HashMap<String, String>, path: &str) -> Result<String> {
    if !s.contains('$') {
        return Ok(s.to_string());
    }

    let mut missing: Option<MissingEnvVarError> = None;
    let substituted = ENV_VAR_PATTERN.replace_all(s, |caps: &Captures| {
        let whole = &caps[0];
        let var_name = &caps[1];
        if whole.starts_with("$$") {
            return format!("${{{var_name}}}");
        }
        match env.get(var_name) {
            Some(val) if !val.is_empty() => val.clone(),
            _ => {
                if missing.is_none() {
                    missing = Some(MissingEnvVarError {
                        var_name: var_name.to_string(),
                        config_path: path.to_string(),
                    });
                }
                String::new()
            }
        }
    });

    if let Some(err) = missing {
        bail!(err);
    }
    Ok(substituted.into_owned())
}

/// Whether a string holds an unescaped `${VAR}` reference.
pub fn contains_env_var_reference(s: &str) -> bool {
    ENV_VAR_PATTERN
        .captures_iter(s)
        .any(|caps| !caps[0].starts_with("$$"))
}

/// Every variable name referenced in a value tree, sorted and deduplicated.
pub fn collect_referenced_vars(value: &Value) -> Vec<String> {
    let mut vars = Vec::new();
    collect_vars_recursive(value, &mut vars);
    vars.sort();
    vars.dedup();
    vars
}

fn collect_vars_recursive(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::String(s) => {
            for caps in ENV_VAR_PATTERN.captures_iter(s) {
                if !caps[0].starts_with("$$") {
                    out.push(caps[1].to_string());
                }
            }
        }
        Value::Array(arr) => arr.iter().for_each(|v| collect_vars_recursive(v, out)),
        Value::Object(map) => map.values().for_each(|v| collect_vars_recursive(v, out)),
        _ => {}
    }
}

/// Let well-known variables override provider settings.
///
/// Empty values are ignored. An unparsable `LAYOUTFORGE_PROVIDER` is an error.
pub fn apply_env_overrides(
    mut config: LayoutForgeConfig,
    env: &HashMap<String, String>,
) -> Result<LayoutForgeConfig> {
    let get = |name: &str| env.get(name).map(|v| v.trim()).filter(|v| !v.is_empty());

    let provider = config.provider.get_or_insert_with(ProviderSection::default);
    if let Some(kind) = get(PROVIDER_VAR) {
        let kind: ProviderKind = kind
            .parse()
            .map_err(|e: String| anyhow::anyhow!("{PROVIDER_VAR}: {e}"))?;
        debug!(%kind, "Provider selected from environment");
        provider.kind = Some(kind);
    }

    let overrides = [
        (GEMINI_API_KEY_VAR, Backend::Gemini, Field::ApiKey),
        (GEMINI_MODEL_VAR, Backend::Gemini, Field::Model),
        (OPENAI_API_KEY_VAR, Backend::OpenAi, Field::ApiKey),
        (OPENAI_BASE_URL_VAR, Backend::OpenAi, Field::BaseUrl),
        (OPENAI_MODEL_VAR, Backend::OpenAi, Field::Model),
    ];
    for (var, backend, field) in overrides {
        let Some(value) = get(var) else { continue };
        let section = match backend {
            Backend::Gemini => provider.gemini.get_or_insert_with(BackendSection::default),
            Backend::OpenAi => provider.openai.get_or_insert_with(BackendSection::default),
        };
        let slot = match field {
            Field::ApiKey => &mut section.api_key,
            Field::Model => &mut section.model,
            Field::BaseUrl => &mut section.base_url,
        };
        debug!(var, "Config value overridden from environment");
        *slot = Some(value.to_string());
    }

    Ok(config)
}

#[derive(Clone, Copy)]
enum Backend {
    Gemini,
    OpenAi,
}

#[derive(Clone, Copy)]
enum Field {
    ApiKey,
    Model,
    BaseUrl,
}
