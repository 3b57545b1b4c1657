//! Config validation with field paths in every message.
//!
//! Checks presence and basic ranges only; nothing here contacts a backend.

use crate::schema::LayoutForgeConfig;
use layoutforge_core::presets::style_preset;
use thiserror::Error;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

pub fn validate(config: &LayoutForgeConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_provider(config, &mut report);
    validate_generation(config, &mut report);
    validate_logging(config, &mut report);
    report
}

fn validate_provider(config: &LayoutForgeConfig, report: &mut ValidationReport) {
    let provider = config.provider_config();
    let path = format!("provider.{}", provider.kind);
    let active = provider.active();

    if active.credential().is_none() {
        report.warn(
            format!("{path}.apiKey"),
            "No API key configured; generation calls will fail",
        );
    }
    if active.model.trim().is_empty() {
        report.error(format!("{path}.model"), "Model name cannot be empty");
    }
    if !(active.base_url.starts_with("http://") || active.base_url.starts_with("https://")) {
        report.error(
            format!("{path}.baseUrl"),
            format!("'{}' is not an http(s) URL", active.base_url),
        );
    }
    if provider.timeout_secs == 0 {
        report.error("provider.timeoutSecs", "timeoutSecs must be >= 1");
    }
    if provider.connect_timeout_secs == 0 {
        report.error("provider.connectTimeoutSecs", "connectTimeoutSecs must be >= 1");
    }
}

fn validate_generation(config: &LayoutForgeConfig, report: &mut ValidationReport) {
    let Some(generation) = &config.generation else { return };

    if let Some(name) = &generation.style_preset {
        if style_preset(name).is_none() {
            report.error(
                "generation.stylePreset",
                format!("Unknown style preset '{name}'"),
            );
        }
    }
    if generation
        .style_prompt
        .as_deref()
        .is_some_and(|p| p.trim().is_empty())
    {
        report.warn("generation.stylePrompt", "Style prompt is blank");
    }
    if generation.chunk_size == Some(0) {
        report.error("generation.chunkSize", "chunkSize must be >= 1");
    }
    if generation.sample_chars == Some(0) {
        report.error("generation.sampleChars", "sampleChars must be >= 1");
    }
    if generation.variations == Some(0) {
        report.warn("generation.variations", "variations of 0 is treated as 1");
    }
}

fn validate_logging(config: &LayoutForgeConfig, report: &mut ValidationReport) {
    let Some(level) = config.log_level() else { return };
    if !LOG_LEVELS.contains(&level.to_ascii_lowercase().as_str()) {
        report.error(
            "logging.level",
            format!("Unknown level '{level}'. Use one of {}", LOG_LEVELS.join(", ")),
        );
    }
}
