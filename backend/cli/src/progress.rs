//! Drains pipeline events into progress lines on stderr.

use tokio::sync::mpsc::Receiver;
use tokio::task::JoinHandle;

use layoutforge_core::PipelineEvent;
use layoutforge_logging::EventLogger;

use crate::terminal_output::{note_progress, note_warn};

/// Spawn the drain task. It ends once every sender is dropped.
pub fn spawn_progress(mut rx: Receiver<PipelineEvent>, run_id: String) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            EventLogger::log_event(&run_id, &event);
            match progress_line(&event) {
                Some(Line::Progress(line)) => note_progress(&line),
                Some(Line::Warning(line)) => note_warn(&line),
                None => {}
            }
        }
    })
}

#[derive(Debug, PartialEq, Eq)]
pub enum Line {
    Progress(String),
    Warning(String),
}

/// Human-readable line for an event. Token events are too chatty to print.
pub fn progress_line(event: &PipelineEvent) -> Option<Line> {
    let line = match event {
        PipelineEvent::DesignReady { design } => Line::Progress(format!(
            "[design] {} ({})",
            design.theme_name, design.layout_type
        )),
        PipelineEvent::ContentProgress {
            index,
            total,
            enhanced: true,
            ..
        } => Line::Progress(format!("[content] chunk {}/{total} rewritten", index + 1)),
        PipelineEvent::ContentProgress { index, total, .. } => Line::Warning(format!(
            "[content] chunk {}/{total} kept as written",
            index + 1
        )),
        PipelineEvent::CardStarted { index, total } => {
            Line::Progress(format!("[cards] card {}/{total} ...", index + 1))
        }
        PipelineEvent::CardToken { .. } => return None,
        PipelineEvent::CardCompleted { index, html } => Line::Progress(format!(
            "[cards] card {} done ({} bytes)",
            index + 1,
            html.len()
        )),
        PipelineEvent::CardFailed { index, reason } => {
            Line::Warning(format!("[cards] card {} failed: {reason}", index + 1))
        }
        PipelineEvent::WrapperFallback { reason } => {
            Line::Warning(format!("[wrapper] using plain shell: {reason}"))
        }
    };
    Some(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use layoutforge_core::presets::default_design;

    #[test]
    fn lines_are_one_based() {
        assert_eq!(
            progress_line(&PipelineEvent::CardStarted { index: 0, total: 3 }),
            Some(Line::Progress("[cards] card 1/3 ...".into()))
        );
        assert_eq!(
            progress_line(&PipelineEvent::ContentProgress {
                index: 1,
                total: 2,
                enhanced: false,
                accumulated: String::new(),
            }),
            Some(Line::Warning("[content] chunk 2/2 kept as written".into()))
        );
    }

    #[test]
    fn tokens_are_silent() {
        let token = PipelineEvent::CardToken {
            index: 0,
            partial_html: "<p".into(),
        };
        assert_eq!(progress_line(&token), None);
        let design = PipelineEvent::DesignReady {
            design: default_design(),
        };
        assert_eq!(
            progress_line(&design),
            Some(Line::Progress("[design] Classic Paper (card)".into()))
        );
    }

    #[tokio::test]
    async fn drain_finishes_when_senders_drop() {
        let (sink, rx) = layoutforge_core::channel(None);
        let handle = spawn_progress(rx, "run".into());
        sink.emit(PipelineEvent::CardStarted { index: 0, total: 1 }).await;
        drop(sink);
        handle.await.unwrap();
    }
}
