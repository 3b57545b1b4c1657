//! Markdown segmentation and cleanup utilities.
//!
//! Splits long documents into bounded chunks for rewriting, splits styled
//! markdown into blocks for per-card export, and strips the code-fence
//! wrappers models like to add around their answers.

pub mod escape;
pub mod fence;
pub mod plain;
pub mod segment;

pub use escape::escape_html;
pub use fence::{strip_code_fences, unwrap_outer_fence};
pub use plain::to_plain_text;
pub use segment::{block_split, chunk_by_size};
