use tracing::{debug, info, warn};

use layoutforge_core::{
    DesignDescriptor, DesignGenerationError, GenerationProvider, GenerationRequest, LayoutPreference,
};
use layoutforge_markdown::strip_code_fences;

use crate::options::{head_chars, DEFAULT_SAMPLE_CHARS};
use crate::prompts;

/// Recover the JSON object from a model answer.
///
/// Models wrap JSON in code fences or surround it with prose despite JSON
/// mode; everything outside the outermost `{...}` is dropped.
pub fn extract_json_object(text: &str) -> String {
    let stripped = strip_code_fences(text);
    match (stripped.find('{'), stripped.rfind('}')) {
        (Some(start), Some(end)) if start < end => stripped[start..=end].to_string(),
        _ => stripped,
    }
}

/// Generate one design descriptor from a style request and the document content.
///
/// Only the first 800 characters of `content` are shown to the model. Any
/// provider failure or rejected response is an error; no partial descriptor
/// is ever returned.
pub async fn generate_design(
    provider: &dyn GenerationProvider,
    style_request: &str,
    content: &str,
    layout: &LayoutPreference,
) -> Result<DesignDescriptor, DesignGenerationError> {
    request_design(
        provider,
        style_request,
        head_chars(content, DEFAULT_SAMPLE_CHARS),
        layout,
        None,
    )
    .await
}

pub(crate) async fn request_design(
    provider: &dyn GenerationProvider,
    style_request: &str,
    sample: &str,
    layout: &LayoutPreference,
    variation: Option<(usize, usize)>,
) -> Result<DesignDescriptor, DesignGenerationError> {
    let request = GenerationRequest::json(
        prompts::design_prompt(style_request, sample, layout, variation),
        prompts::DESIGN_SYSTEM,
        Some(DesignDescriptor::json_schema()),
    );
    debug!(provider = provider.name(), %layout, ?variation, "Requesting design");

    let raw = provider.generate(&request).await?;
    let mut design = DesignDescriptor::from_json(&extract_json_object(&raw))?;

    if let LayoutPreference::Fixed(wanted) = layout {
        if design.layout_type != *wanted {
            debug!(returned = %design.layout_type, %wanted, "Overriding layout to match preference");
            design.layout_type = *wanted;
        }
    }

    info!(theme = %design.theme_name, layout = %design.layout_type, "Design generated");
    Ok(design)
}

/// Generate up to `count` alternative designs, one request at a time.
///
/// Failed variations are logged and skipped; only a run where every
/// variation fails is an error.
pub async fn generate_design_variations(
    provider: &dyn GenerationProvider,
    style_request: &str,
    content: &str,
    layout: &LayoutPreference,
    count: usize,
) -> Result<Vec<DesignDescriptor>, DesignGenerationError> {
    variations(
        provider,
        style_request,
        head_chars(content, DEFAULT_SAMPLE_CHARS),
        layout,
        count,
    )
    .await
}

pub(crate) async fn variations(
    provider: &dyn GenerationProvider,
    style_request: &str,
    sample: &str,
    layout: &LayoutPreference,
    count: usize,
) -> Result<Vec<DesignDescriptor>, DesignGenerationError> {
    let count = count.max(1);
    let mut designs = Vec::with_capacity(count);
    for n in 1..=count {
        match request_design(provider, style_request, sample, layout, Some((n, count))).await {
            Ok(design) => designs.push(design),
            Err(e) => warn!(variation = n, error = %e, "Design variation failed"),
        }
    }
    if designs.is_empty() {
        return Err(DesignGenerationError::NoVariations { attempted: count });
    }
    Ok(designs)
}
