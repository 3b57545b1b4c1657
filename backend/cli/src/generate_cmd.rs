//! `layoutforge generate`: design plus rewritten content.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use layoutforge_config::LayoutForgeConfig;
use layoutforge_core::LayoutPreference;

use crate::context::{pipeline_options, read_design, read_input, resolve_style, write_output, Session};
use crate::terminal_output::note_success;

#[derive(Args)]
pub struct GenerateArgs {
    /// Source text or markdown
    #[arg(short, long)]
    pub input: PathBuf,
    /// Free-form style request
    #[arg(long, conflicts_with = "preset")]
    pub style: Option<String>,
    /// Built-in style prompt (see `layoutforge presets`)
    #[arg(long)]
    pub preset: Option<String>,
    /// auto, card, flat or multi-card
    #[arg(long)]
    pub layout: Option<LayoutPreference>,
    /// Reuse this design descriptor instead of generating one
    #[arg(long)]
    pub design: Option<PathBuf>,
    /// Where to save the design descriptor as JSON
    #[arg(long)]
    pub out_design: Option<PathBuf>,
    /// Where to save the rewritten markdown (stdout when omitted)
    #[arg(long)]
    pub out_markdown: Option<PathBuf>,
}

pub async fn run(config: &LayoutForgeConfig, args: GenerateArgs) -> Result<()> {
    let content = read_input(&args.input).await?;
    let style = resolve_style(config, args.style.as_deref(), args.preset.as_deref())?;
    let layout = args
        .layout
        .or(config.generation().layout)
        .unwrap_or_default();
    let existing = match &args.design {
        Some(path) => Some(read_design(path).await?),
        None => None,
    };

    let session = Session::start(config, pipeline_options(config, None))?;
    let outcome = session
        .pipeline
        .generate(&style, &content, layout, existing)
        .await;
    session.finish().await;
    let outcome = outcome?;

    if let Some(path) = &args.out_design {
        let json = serde_json::to_string_pretty(&outcome.design).context("Failed to serialize design")?;
        write_output(Some(path), &json).await?;
        note_success(&format!("Design \"{}\" saved to {}", outcome.design.theme_name, path.display()));
    }
    write_output(args.out_markdown.as_deref(), &outcome.content).await?;
    note_success("Content generated");
    Ok(())
}
