//! Pipeline Event Logger
//!
//! Records each pipeline event as a compact structured trace line.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use layoutforge_core::{EventKind, PipelineEvent};

use crate::redact::redact_sensitive_data;

#[derive(Debug, Serialize)]
pub struct EventLogEntry {
    pub run_id: String,
    pub timestamp: DateTime<Utc>,
    pub kind: EventKind,
    pub index: Option<usize>,
    pub payload_bytes: usize,
    /// Failure reason, scrubbed, for failure events only.
    pub reason: Option<String>,
}

impl EventLogEntry {
    pub fn new(run_id: &str, event: &PipelineEvent) -> Self {
        let reason = match event {
            PipelineEvent::CardFailed { reason, .. } | PipelineEvent::WrapperFallback { reason } => {
                Some(redact_sensitive_data(reason))
            }
            _ => None,
        };
        Self {
            run_id: run_id.to_string(),
            timestamp: Utc::now(),
            kind: event.kind(),
            index: event.index(),
            payload_bytes: event.payload_len(),
            reason,
        }
    }
}

pub struct EventLogger;

impl EventLogger {
    /// Trace one pipeline event at debug level. Payloads are never logged, only their size.
    pub fn log_event(run_id: &str, event: &PipelineEvent) -> EventLogEntry {
        let entry = EventLogEntry::new(run_id, event);
        debug!(
            target: "pipeline_events",
            run_id = %entry.run_id,
            kind = %entry.kind,
            index = ?entry.index,
            payload_bytes = entry.payload_bytes,
            reason = entry.reason.as_deref().unwrap_or(""),
            "Pipeline event"
        );
        entry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_carries_kind_index_and_size() {
        let entry = EventLogger::log_event(
            "run-1",
            &PipelineEvent::CardToken {
                index: 2,
                partial_html: "<section>".into(),
            },
        );
        assert_eq!(entry.kind, EventKind::CardToken);
        assert_eq!(entry.index, Some(2));
        assert_eq!(entry.payload_bytes, 9);
        assert!(entry.reason.is_none());
    }

    #[test]
    fn failure_reason_is_scrubbed() {
        let entry = EventLogEntry::new(
            "run-1",
            &PipelineEvent::CardFailed {
                index: 0,
                reason: "401 for Bearer abc.def".into(),
            },
        );
        assert_eq!(entry.reason.as_deref(), Some("401 for [REDACTED_TOKEN]"));
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["kind"], "card_failed");
    }
}
