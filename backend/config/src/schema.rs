//! LayoutForge configuration schema.
//!
//! Every field is optional on disk; [`apply_all_defaults`](crate::apply_all_defaults)
//! fills the gaps after loading.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use layoutforge_core::provider_config::{
    DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL,
    DEFAULT_OPENAI_BASE_URL, DEFAULT_OPENAI_MODEL, DEFAULT_TIMEOUT_SECS,
};
use layoutforge_core::{
    BackendSettings, CardFailurePolicy, LayoutPreference, ProviderConfig, ProviderKind,
};

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutForgeConfig {
    /// Generation backend selection and credentials
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<ProviderSection>,

    /// Style request and pipeline tunables
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation: Option<GenerationConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export: Option<ExportConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ProviderKind>,
    /// Per-request timeout for single-shot calls.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connect_timeout_secs: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gemini: Option<BackendSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openai: Option<BackendSection>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Free-form style request sent to the design and content stages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style_prompt: Option<String>,
    /// Name of a built-in style prompt, used when `stylePrompt` is unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style_preset: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<LayoutPreference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunk_size: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_chars: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_chars: Option<usize>,
    /// Number of designs requested by `design --variations`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variations: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_failure: Option<CardFailurePolicy>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    /// Directory for the rolling JSON log file; console only when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

impl BackendSection {
    fn settings(&self, default_model: &str, default_base_url: &str) -> BackendSettings {
        BackendSettings {
            api_key: self.api_key.clone(),
            model: self
                .model
                .clone()
                .unwrap_or_else(|| default_model.to_string()),
            base_url: self
                .base_url
                .clone()
                .unwrap_or_else(|| default_base_url.to_string()),
        }
    }
}

impl LayoutForgeConfig {
    /// Provider settings with every unset field at its built-in default.
    pub fn provider_config(&self) -> ProviderConfig {
        let section = self.provider.clone().unwrap_or_default();
        ProviderConfig {
            kind: section.kind.unwrap_or_default(),
            timeout_secs: section.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
            connect_timeout_secs: section
                .connect_timeout_secs
                .unwrap_or(DEFAULT_CONNECT_TIMEOUT_SECS),
            gemini: section
                .gemini
                .unwrap_or_default()
                .settings(DEFAULT_GEMINI_MODEL, DEFAULT_GEMINI_BASE_URL),
            openai: section
                .openai
                .unwrap_or_default()
                .settings(DEFAULT_OPENAI_MODEL, DEFAULT_OPENAI_BASE_URL),
        }
    }

    pub fn generation(&self) -> GenerationConfig {
        self.generation.clone().unwrap_or_default()
    }

    pub fn card_failure(&self) -> CardFailurePolicy {
        self.export
            .as_ref()
            .and_then(|e| e.card_failure)
            .unwrap_or_default()
    }

    pub fn log_level(&self) -> Option<&str> {
        self.logging.as_ref().and_then(|l| l.level.as_deref())
    }

    pub fn log_dir(&self) -> Option<&std::path::Path> {
        self.logging.as_ref().and_then(|l| l.dir.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use layoutforge_core::LayoutType;

    #[test]
    fn parses_documented_layout() {
        let yaml = r#"
provider:
  kind: openai
  timeoutSecs: 30
  openai:
    apiKey: sk-test
    model: gpt-4o
generation:
  stylePrompt: tech blog
  layout: multi-card
  chunkSize: 500
export:
  cardFailure: skip
logging:
  level: debug
"#;
        let cfg: LayoutForgeConfig = serde_yaml::from_str(yaml).unwrap();
        let provider = cfg.provider_config();
        assert_eq!(provider.kind, ProviderKind::OpenAi);
        assert_eq!(provider.timeout_secs, 30);
        assert_eq!(provider.active().model, "gpt-4o");
        assert_eq!(provider.active().base_url, DEFAULT_OPENAI_BASE_URL);
        assert_eq!(provider.gemini.model, DEFAULT_GEMINI_MODEL);

        let generation = cfg.generation();
        assert_eq!(generation.layout, Some(LayoutPreference::Fixed(LayoutType::MultiCard)));
        assert_eq!(generation.chunk_size, Some(500));
        assert_eq!(cfg.card_failure(), CardFailurePolicy::Skip);
        assert_eq!(cfg.log_level(), Some("debug"));
    }

    #[test]
    fn unknown_layout_is_rejected() {
        let err = serde_yaml::from_str::<LayoutForgeConfig>("generation:\n  layout: grid\n").unwrap_err();
        assert!(err.to_string().contains("grid"));
    }

    #[test]
    fn empty_file_is_all_defaults() {
        let cfg: LayoutForgeConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(cfg, LayoutForgeConfig::default());
        assert_eq!(cfg.provider_config(), ProviderConfig::default());
    }
}
