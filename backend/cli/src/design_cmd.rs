//! `layoutforge design`: one or more design descriptors, no content rewrite.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use layoutforge_config::LayoutForgeConfig;
use layoutforge_core::LayoutPreference;

use crate::context::{pipeline_options, read_input, resolve_style, write_output, Session};
use crate::terminal_output::note_success;

#[derive(Args)]
pub struct DesignArgs {
    #[arg(short, long)]
    pub input: PathBuf,
    #[arg(long, conflicts_with = "preset")]
    pub style: Option<String>,
    #[arg(long)]
    pub preset: Option<String>,
    #[arg(long)]
    pub layout: Option<LayoutPreference>,
    /// Number of alternative designs to request
    #[arg(long)]
    pub variations: Option<usize>,
    /// Where to save the JSON (stdout when omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub async fn run(config: &LayoutForgeConfig, args: DesignArgs) -> Result<()> {
    let content = read_input(&args.input).await?;
    let style = resolve_style(config, args.style.as_deref(), args.preset.as_deref())?;
    let generation = config.generation();
    let layout = args.layout.or(generation.layout).unwrap_or_default();
    let count = args.variations.or(generation.variations).unwrap_or(1);

    let session = Session::start(config, pipeline_options(config, None))?;
    let designs = session
        .pipeline
        .design_variations(&style, &content, layout, count)
        .await;
    session.finish().await;
    let designs = designs?;

    let json = if designs.len() == 1 {
        serde_json::to_string_pretty(&designs[0])
    } else {
        serde_json::to_string_pretty(&designs)
    }
    .context("Failed to serialize designs")?;
    write_output(args.output.as_deref(), &json).await?;

    let names: Vec<_> = designs.iter().map(|d| d.theme_name.as_str()).collect();
    note_success(&format!("{} design(s): {}", designs.len(), names.join(", ")));
    Ok(())
}
