//! LayoutForge configuration management.
//!
//! Provides:
//! - Typed config schema (provider, generation, export, logging)
//! - YAML read/write with atomic replacement
//! - `${ENV_VAR}` substitution and well-known env overrides
//! - Config redaction for safe display
//! - Default value application and validation

pub mod defaults;
pub mod env;
pub mod io;
pub mod redact;
pub mod schema;
pub mod validation;

pub use defaults::apply_all_defaults;
pub use env::{
    apply_env_overrides, collect_referenced_vars, contains_env_var_reference, process_env,
    resolve_env_vars, MissingEnvVarError,
};
pub use io::{config_dir, config_file_path, load_config, write_config};
pub use redact::{collect_redacted_paths, redact};
pub use schema::{
    BackendSection, ExportConfig, GenerationConfig, LayoutForgeConfig, LoggingConfig,
    ProviderSection,
};
pub use validation::{validate, ConfigValidationError, ValidationReport};

use anyhow::{Context, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

/// Load a config file and make it ready for use.
///
/// Steps: parse, substitute `${VAR}` references, apply env overrides, fill
/// defaults, validate. Validation warnings are logged; errors abort.
pub async fn load_and_prepare(path: &Path, env: &HashMap<String, String>) -> Result<LayoutForgeConfig> {
    let raw_config = load_config(path).await?;

    let value: Value =
        serde_json::to_value(&raw_config).context("Failed to serialize config for processing")?;
    let value = resolve_env_vars(&value, env).context("Failed to resolve env vars in config")?;
    let config: LayoutForgeConfig =
        serde_json::from_value(value).context("Failed to deserialize config after processing")?;

    let config = apply_env_overrides(config, env)?;
    let config = apply_all_defaults(config);

    let report = validate(&config);
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    if let Some(first) = report.errors.first() {
        for error in &report.errors {
            tracing::error!(path = %error.path, message = %error.message, "Config error");
        }
        anyhow::bail!(
            "{} invalid config value(s); first: {}",
            report.errors.len(),
            first
        );
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use layoutforge_core::ProviderKind;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[tokio::test]
    async fn prepares_file_with_env_references() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        tokio::fs::write(
            &path,
            "provider:\n  kind: openai\n  openai:\n    apiKey: \"${MY_KEY}\"\n",
        )
        .await
        .unwrap();

        let cfg = load_and_prepare(&path, &env(&[("MY_KEY", "sk-file")])).await.unwrap();
        let provider = cfg.provider_config();
        assert_eq!(provider.kind, ProviderKind::OpenAi);
        assert_eq!(provider.openai.credential(), Some("sk-file"));
        assert_eq!(cfg.generation().chunk_size, Some(defaults::DEFAULT_CHUNK_SIZE));
    }

    #[tokio::test]
    async fn env_override_beats_file_value() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        tokio::fs::write(&path, "provider:\n  gemini:\n    model: from-file\n")
            .await
            .unwrap();
        let cfg = load_and_prepare(&path, &env(&[("GEMINI_MODEL", "from-env")]))
            .await
            .unwrap();
        assert_eq!(cfg.provider_config().gemini.model, "from-env");
    }

    #[tokio::test]
    async fn invalid_values_abort() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        tokio::fs::write(&path, "generation:\n  chunkSize: 0\n").await.unwrap();
        let err = load_and_prepare(&path, &HashMap::new()).await.unwrap_err();
        assert!(err.to_string().contains("generation.chunkSize"));
    }

    #[tokio::test]
    async fn missing_env_reference_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        tokio::fs::write(&path, "provider:\n  gemini:\n    apiKey: \"${ABSENT}\"\n")
            .await
            .unwrap();
        let err = load_and_prepare(&path, &HashMap::new()).await.unwrap_err();
        assert!(format!("{err:#}").contains("ABSENT"));
    }
}
