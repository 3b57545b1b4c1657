//! `layoutforge config show|init|validate`.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{bail, Context, Result};

use layoutforge_config::{
    apply_all_defaults, apply_env_overrides, collect_redacted_paths, collect_referenced_vars,
    load_config, redact, resolve_env_vars, validate, write_config, LayoutForgeConfig,
    ProviderSection, ValidationReport,
};
use layoutforge_core::ProviderKind;

use crate::terminal_output::{note_error, note_info, note_success, note_warn};

/// Effective config: file, `${VAR}` substitution, env overrides, defaults.
async fn effective(path: &Path, env: &HashMap<String, String>) -> Result<LayoutForgeConfig> {
    let raw = load_config(path).await?;
    let value = serde_json::to_value(&raw).context("Failed to serialize config")?;
    let referenced = collect_referenced_vars(&value);
    if !referenced.is_empty() {
        note_info(&format!("Env references: {}", referenced.join(", ")));
    }
    let value = resolve_env_vars(&value, env)?;
    let config: LayoutForgeConfig = serde_json::from_value(value).context("Failed to read config")?;
    Ok(apply_all_defaults(apply_env_overrides(config, env)?))
}

pub async fn show(path: &Path, env: &HashMap<String, String>) -> Result<()> {
    let config = effective(path, env).await?;
    let value = serde_json::to_value(&config).context("Failed to serialize config")?;
    let yaml = serde_yaml::to_string(&redact(&value)).context("Failed to render config")?;
    note_info(&format!("Config file: {}", path.display()));
    let masked = collect_redacted_paths(&value);
    if !masked.is_empty() {
        note_info(&format!("Masked: {}", masked.join(", ")));
    }
    print!("{yaml}");
    Ok(())
}

/// Write a starter file. API keys are left out; they come from the environment.
pub async fn init(path: &Path, kind: Option<ProviderKind>, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    let config = apply_all_defaults(LayoutForgeConfig {
        provider: Some(ProviderSection {
            kind: Some(kind.unwrap_or_default()),
            ..Default::default()
        }),
        ..Default::default()
    });
    write_config(&config, path).await?;
    note_success(&format!("Wrote {}", path.display()));
    Ok(())
}

fn print_report(report: &ValidationReport) {
    for warning in &report.warnings {
        note_warn(&format!("{}: {}", warning.path, warning.message));
    }
    for error in &report.errors {
        note_error(&format!("{}: {}", error.path, error.message));
    }
}

pub async fn check(path: &Path, env: &HashMap<String, String>) -> Result<ValidationReport> {
    let config = effective(path, env).await?;
    let report = validate(&config);
    print_report(&report);
    if !report.is_valid() {
        bail!("{} error(s) in {}", report.errors.len(), path.display());
    }
    note_success("Config is valid");
    Ok(report)
}
