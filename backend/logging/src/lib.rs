//! Structured logging for LayoutForge.
//!
//! Console plus optional rolling NDJSON file output, secret scrubbing, and
//! pipeline event tracing.

pub mod event_logger;
pub mod logger;
pub mod redact;

pub use event_logger::{EventLogEntry, EventLogger};
pub use logger::init_logger;
pub use redact::redact_sensitive_data;
