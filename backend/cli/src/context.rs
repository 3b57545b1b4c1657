//! Shared setup for commands that talk to a generation backend.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use tokio::task::JoinHandle;
use tracing::warn;

use layoutforge_config::{config_dir, config_file_path, LayoutForgeConfig};
use layoutforge_core::presets::style_preset;
use layoutforge_core::{channel, CancelToken, CardFailurePolicy, DesignDescriptor, ProviderKind};
use layoutforge_pipeline::{LayoutPipeline, PipelineOptions};
use layoutforge_providers::build_provider;

use crate::progress::spawn_progress;

/// Config file chosen by `--config`, else the default location.
pub fn config_path(explicit: Option<&Path>) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(|| config_file_path(&config_dir()))
}

/// Pick the style request: `--style`, then `--preset`, then the config file.
pub fn resolve_style(
    config: &LayoutForgeConfig,
    style: Option<&str>,
    preset: Option<&str>,
) -> Result<String> {
    if let Some(style) = style.map(str::trim).filter(|s| !s.is_empty()) {
        return Ok(style.to_string());
    }
    if let Some(name) = preset {
        return preset_prompt(name);
    }
    let generation = config.generation();
    if let Some(prompt) = generation.style_prompt.filter(|s| !s.trim().is_empty()) {
        return Ok(prompt);
    }
    match generation.style_preset {
        Some(name) => preset_prompt(&name),
        None => bail!("no style request: pass --style or --preset, or set generation.stylePrompt"),
    }
}

fn preset_prompt(name: &str) -> Result<String> {
    style_preset(name)
        .map(|p| p.prompt.to_string())
        .ok_or_else(|| anyhow!("unknown style preset '{name}'"))
}

pub fn pipeline_options(config: &LayoutForgeConfig, card_failure: Option<CardFailurePolicy>) -> PipelineOptions {
    let generation = config.generation();
    let defaults = PipelineOptions::default();
    PipelineOptions {
        chunk_size: generation.chunk_size.unwrap_or(defaults.chunk_size),
        context_chars: generation.context_chars.unwrap_or(defaults.context_chars),
        sample_chars: generation.sample_chars.unwrap_or(defaults.sample_chars),
        card_failure: card_failure.unwrap_or_else(|| config.card_failure()),
    }
}

pub async fn read_input(path: &Path) -> Result<String> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read input: {}", path.display()))?;
    if text.trim().is_empty() {
        bail!("input {} is empty", path.display());
    }
    Ok(text)
}

pub async fn read_design(path: &Path) -> Result<DesignDescriptor> {
    let body = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read design: {}", path.display()))?;
    DesignDescriptor::from_json(&body)
        .with_context(|| format!("Invalid design descriptor in {}", path.display()))
}

/// Write to `path`, or to stdout when no path is given.
pub async fn write_output(path: Option<&Path>, body: &str) -> Result<()> {
    match path {
        Some(path) => tokio::fs::write(path, body)
            .await
            .with_context(|| format!("Failed to write {}", path.display())),
        None => {
            println!("{body}");
            Ok(())
        }
    }
}

/// A pipeline wired to the configured backend, a progress drain, and Ctrl-C.
pub struct Session {
    pub pipeline: LayoutPipeline,
    progress: JoinHandle<()>,
}

impl Session {
    pub fn start(config: &LayoutForgeConfig, options: PipelineOptions) -> Result<Self> {
        let provider = build_provider(&config.provider_config())
            .context("Failed to set up the generation provider")?;

        let (sink, rx) = channel(None);
        let progress = spawn_progress(rx, uuid::Uuid::new_v4().to_string());

        let cancel = CancelToken::new();
        let on_interrupt = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted; cancelling run");
                on_interrupt.cancel();
            }
        });

        let pipeline = LayoutPipeline::new(provider)
            .with_options(options)
            .with_events(sink)
            .with_cancel(cancel);
        Ok(Self { pipeline, progress })
    }

    /// Drop the pipeline and wait until every event has been printed.
    pub async fn finish(self) {
        drop(self.pipeline);
        let _ = self.progress.await;
    }
}

/// Apply `--provider` on top of the loaded config.
pub fn with_provider(mut config: LayoutForgeConfig, kind: Option<ProviderKind>) -> LayoutForgeConfig {
    if let Some(kind) = kind {
        config.provider.get_or_insert_with(Default::default).kind = Some(kind);
    }
    config
}
