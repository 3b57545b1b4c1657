//! Locating, reading and writing `config.yaml`.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::fs;
use tracing::{debug, info};

use crate::schema::LayoutForgeConfig;

const CONFIG_FILE_NAME: &str = "config.yaml";

const FILE_HEADER: &str = "\
# LayoutForge configuration.
# API keys are read from GEMINI_API_KEY / OPENAI_API_KEY, or from
# provider.<kind>.apiKey (which may reference \"${VAR}\").
";

/// Resolve the config directory.
/// Priority: `LAYOUTFORGE_CONFIG_DIR` env > platform config dir > `~/.layoutforge/`.
pub fn config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("LAYOUTFORGE_CONFIG_DIR") {
        return PathBuf::from(dir);
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("layoutforge");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".layoutforge");
    }
    PathBuf::from(".layoutforge")
}

pub fn config_file_path(config_dir: &Path) -> PathBuf {
    config_dir.join(CONFIG_FILE_NAME)
}

/// Parse the config at `path`. A missing or blank file is the empty config.
pub async fn load_config(path: &Path) -> Result<LayoutForgeConfig> {
    let raw = match fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "No config file; using defaults");
            return Ok(LayoutForgeConfig::default());
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to read config file: {}", path.display()))
        }
    };
    if raw.trim().is_empty() {
        return Ok(LayoutForgeConfig::default());
    }

    let config = serde_yaml::from_str(&raw)
        .with_context(|| format!("Failed to parse config YAML at: {}", path.display()))?;
    debug!(path = %path.display(), "Loaded config");
    Ok(config)
}

/// Replace the file at `path` in one step: write a sibling temp file, then
/// rename it over the target. A reader never sees a half-written file.
pub async fn write_config(config: &LayoutForgeConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
    }

    let yaml = serde_yaml::to_string(config).context("Failed to serialize config to YAML")?;
    let tmp_path = path.with_extension(format!("yaml.{}.tmp", std::process::id()));
    fs::write(&tmp_path, format!("{FILE_HEADER}{yaml}"))
        .await
        .with_context(|| format!("Failed to write temp config: {}", tmp_path.display()))?;
    if let Err(e) = fs::rename(&tmp_path, path).await {
        let _ = fs::remove_file(&tmp_path).await;
        return Err(e).with_context(|| format!("Failed to replace config: {}", path.display()));
    }

    info!(path = %path.display(), "Wrote config");
    Ok(())
}
