//! LayoutForge generation pipeline
//!
//! Turns a style request and raw text into a design descriptor, rewrites the
//! text chunk by chunk in that style, and exports the result as streamed HTML
//! cards inside a generated page shell. Every stage reports progress through
//! an [`EventSink`](layoutforge_core::EventSink) and honors a shared
//! [`CancelToken`](layoutforge_core::CancelToken).

pub mod cards;
pub mod design;
pub mod enhance;
pub mod export;
mod guard;
pub mod options;
pub mod prompts;
pub mod run;
pub mod wrapper;

pub use cards::{export_cards, finalize_fragment, CardExportReport};
pub use design::{extract_json_object, generate_design, generate_design_variations};
pub use enhance::enhance_content;
pub use export::{export_document, fallback_card, ExportArtifact};
pub use options::PipelineOptions;
pub use run::{GenerationOutcome, LayoutPipeline};
pub use wrapper::{generate_wrapper, post_process_wrapper, WrapperTemplate, FALLBACK_TEMPLATE};
