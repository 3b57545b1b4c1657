use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::debug;

use crate::design::DesignDescriptor;

/// Default channel buffer size for pipeline events.
const DEFAULT_BUFFER_SIZE: usize = 256;

/// Progress notifications emitted by the pipeline, in production order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PipelineEvent {
    /// A design descriptor is available (generated or reused).
    DesignReady { design: DesignDescriptor },
    /// One chunk was processed; `accumulated` is the content so far.
    ContentProgress {
        index: usize,
        total: usize,
        enhanced: bool,
        accumulated: String,
    },
    CardStarted { index: usize, total: usize },
    CardToken { index: usize, partial_html: String },
    CardCompleted { index: usize, html: String },
    CardFailed { index: usize, reason: String },
    /// The wrapper template degraded to the built-in fallback.
    WrapperFallback { reason: String },
}

/// Categories of pipeline events.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    DesignReady,
    ContentProgress,
    CardStarted,
    CardToken,
    CardCompleted,
    CardFailed,
    WrapperFallback,
}

impl PipelineEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::DesignReady { .. } => EventKind::DesignReady,
            Self::ContentProgress { .. } => EventKind::ContentProgress,
            Self::CardStarted { .. } => EventKind::CardStarted,
            Self::CardToken { .. } => EventKind::CardToken,
            Self::CardCompleted { .. } => EventKind::CardCompleted,
            Self::CardFailed { .. } => EventKind::CardFailed,
            Self::WrapperFallback { .. } => EventKind::WrapperFallback,
        }
    }

    /// Chunk or card index the event refers to, if any.
    pub fn index(&self) -> Option<usize> {
        match self {
            Self::ContentProgress { index, .. }
            | Self::CardStarted { index, .. }
            | Self::CardToken { index, .. }
            | Self::CardCompleted { index, .. }
            | Self::CardFailed { index, .. } => Some(*index),
            Self::DesignReady { .. } | Self::WrapperFallback { .. } => None,
        }
    }

    /// Size in bytes of the textual payload, for logging.
    pub fn payload_len(&self) -> usize {
        match self {
            Self::DesignReady { .. } | Self::CardStarted { .. } => 0,
            Self::ContentProgress { accumulated, .. } => accumulated.len(),
            Self::CardToken { partial_html, .. } => partial_html.len(),
            Self::CardCompleted { html, .. } => html.len(),
            Self::CardFailed { reason, .. } | Self::WrapperFallback { reason } => reason.len(),
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = serde_json::to_value(self)
            .ok()
            .and_then(|v| v.as_str().map(String::from))
            .unwrap_or_else(|| format!("{:?}", self));
        write!(f, "{}", s)
    }
}

/// Producer side of the event channel. A disabled sink drops every event.
#[derive(Debug, Clone, Default)]
pub struct EventSink {
    tx: Option<mpsc::Sender<PipelineEvent>>,
}

impl EventSink {
    pub fn new(tx: mpsc::Sender<PipelineEvent>) -> Self {
        Self { tx: Some(tx) }
    }

    pub fn disabled() -> Self {
        Self { tx: None }
    }

    /// Deliver an event, waiting for buffer space. A dropped receiver is not an error.
    pub async fn emit(&self, event: PipelineEvent) {
        let Some(tx) = &self.tx else { return };
        if tx.send(event).await.is_err() {
            debug!("Event receiver dropped; discarding pipeline event");
        }
    }
}

/// Create a connected sink/receiver pair.
pub fn channel(buffer: Option<usize>) -> (EventSink, mpsc::Receiver<PipelineEvent>) {
    let (tx, rx) = mpsc::channel(buffer.unwrap_or(DEFAULT_BUFFER_SIZE));
    (EventSink::new(tx), rx)
}
