//! Inline-style translation for exported HTML.
//!
//! Generated markup is styled with utility classes; most rich-text targets
//! strip `class` attributes and external stylesheets, so every class list is
//! rewritten into an equivalent inline `style` attribute before export.

pub mod markup;
pub mod palette;
pub mod translate;

pub use markup::{
    ensure_single_root, markup_spans, rewrite_markup, sanitize_fragment, top_level_elements,
};
pub use palette::resolve_color;
pub use translate::to_inline_style;
