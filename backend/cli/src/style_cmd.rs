//! Offline style tools: `inline` and `rewrite`. No backend is contacted.

use std::path::PathBuf;

use anyhow::{Context, Result};

use layoutforge_style::{rewrite_markup, sanitize_fragment, to_inline_style};

use crate::context::write_output;

pub fn inline(classes: &[String]) {
    println!("{}", to_inline_style(&classes.join(" ")));
}

pub async fn rewrite(input: PathBuf, sanitize: bool, output: Option<PathBuf>) -> Result<()> {
    let html = tokio::fs::read_to_string(&input)
        .await
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let html = if sanitize { sanitize_fragment(&html) } else { html };
    write_output(output.as_deref(), &rewrite_markup(&html)).await
}
