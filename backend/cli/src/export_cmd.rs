//! `layoutforge export`: styled markdown to an inline-styled HTML fragment.

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::Args;

use layoutforge_config::LayoutForgeConfig;
use layoutforge_core::presets::{default_design, design_preset, DESIGN_PRESET_NAMES};
use layoutforge_core::{CardFailurePolicy, DesignDescriptor};

use crate::context::{pipeline_options, read_design, read_input, write_output, Session};
use crate::terminal_output::{note_success, note_warn};

#[derive(Args)]
pub struct ExportArgs {
    /// Styled markdown, usually the output of `generate`
    #[arg(short, long)]
    pub input: PathBuf,
    /// Design descriptor JSON
    #[arg(long, conflicts_with = "preset")]
    pub design: Option<PathBuf>,
    /// Built-in design
    #[arg(long)]
    pub preset: Option<String>,
    /// fallback or skip
    #[arg(long)]
    pub card_failure: Option<CardFailurePolicy>,
    /// Where to save the HTML (stdout when omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

async fn pick_design(args: &ExportArgs) -> Result<DesignDescriptor> {
    if let Some(path) = &args.design {
        return read_design(path).await;
    }
    match &args.preset {
        Some(name) => design_preset(name).ok_or_else(|| {
            anyhow!(
                "unknown design preset '{name}' (available: {})",
                DESIGN_PRESET_NAMES.join(", ")
            )
        }),
        None => Ok(default_design()),
    }
}

pub async fn run(config: &LayoutForgeConfig, args: ExportArgs) -> Result<()> {
    let markdown = read_input(&args.input).await?;
    let design = pick_design(&args).await?;

    let session = Session::start(config, pipeline_options(config, args.card_failure))?;
    let artifact = session.pipeline.export(&design, &markdown).await;
    session.finish().await;
    let artifact = artifact?;

    write_output(args.output.as_deref(), &artifact.html).await?;
    if !artifact.failures.is_empty() {
        note_warn(&format!("{} card(s) failed", artifact.failures.len()));
    }
    if artifact.wrapper_fallback {
        note_warn("Page shell fell back to a plain section");
    }
    note_success(&format!(
        "Exported {} card(s) with design \"{}\"",
        artifact.cards.len(),
        design.theme_name
    ));
    Ok(())
}
