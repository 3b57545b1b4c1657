//! Applies default values to a parsed config.

use layoutforge_core::LayoutPreference;

use crate::schema::{ExportConfig, GenerationConfig, LayoutForgeConfig, LoggingConfig};

pub const DEFAULT_CHUNK_SIZE: usize = 1000;
pub const DEFAULT_CONTEXT_CHARS: usize = 300;
pub const DEFAULT_SAMPLE_CHARS: usize = 800;
pub const DEFAULT_VARIATIONS: usize = 2;
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_STYLE_PRESET: &str = "wechat";

/// Fill every unset field that has a default. User values are never replaced.
pub fn apply_all_defaults(config: LayoutForgeConfig) -> LayoutForgeConfig {
    let config = apply_generation_defaults(config);
    let config = apply_export_defaults(config);
    apply_logging_defaults(config)
}

fn apply_generation_defaults(mut config: LayoutForgeConfig) -> LayoutForgeConfig {
    let generation = config.generation.get_or_insert_with(GenerationConfig::default);
    if generation.style_prompt.is_none() && generation.style_preset.is_none() {
        generation.style_preset = Some(DEFAULT_STYLE_PRESET.to_string());
    }
    generation.layout.get_or_insert(LayoutPreference::Auto);
    generation.chunk_size.get_or_insert(DEFAULT_CHUNK_SIZE);
    generation.context_chars.get_or_insert(DEFAULT_CONTEXT_CHARS);
    generation.sample_chars.get_or_insert(DEFAULT_SAMPLE_CHARS);
    generation.variations.get_or_insert(DEFAULT_VARIATIONS);
    config
}

fn apply_export_defaults(mut config: LayoutForgeConfig) -> LayoutForgeConfig {
    let export = config.export.get_or_insert_with(ExportConfig::default);
    export.card_failure.get_or_insert_with(Default::default);
    config
}

fn apply_logging_defaults(mut config: LayoutForgeConfig) -> LayoutForgeConfig {
    let logging = config.logging.get_or_insert_with(LoggingConfig::default);
    if logging.level.is_none() {
        logging.level = Some(DEFAULT_LOG_LEVEL.to_string());
    }
    config
}
