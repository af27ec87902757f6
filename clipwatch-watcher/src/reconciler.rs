//! Status reconciliation
//!
//! Maps each observed job status to what the user sees: a presentation for
//! the job's control and, for terminal states, one notice.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use clipwatch_core::{JobId, JobStatus, Severity};
use tracing::debug;

use crate::notifier::{Notice, Notifier};

/// Displayed state of one job's control
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presentation {
    pub label: String,
    pub tone: Severity,
    /// Work is still running on the server
    pub busy: bool,
}

impl Presentation {
    /// Presentation for a status, or `None` when the status must not change
    /// what is displayed
    pub fn for_status(status: &JobStatus) -> Option<Self> {
        let presentation = match status {
            JobStatus::Queued => Self {
                label: "Queued".to_string(),
                tone: Severity::Warning,
                busy: true,
            },
            JobStatus::Processing { .. } => Self {
                label: format!("Processing ({}%)", status.display_progress()),
                tone: Severity::Warning,
                busy: true,
            },
            JobStatus::Completed => Self {
                label: "Completed".to_string(),
                tone: Severity::Success,
                busy: false,
            },
            JobStatus::Failed { .. } => Self {
                label: "Failed".to_string(),
                tone: Severity::Danger,
                busy: false,
            },
            JobStatus::TransportError { .. } => return None,
        };
        Some(presentation)
    }
}

/// Notice shown when a job reaches a terminal status
pub fn terminal_notice(status: &JobStatus) -> Option<Notice> {
    match status {
        JobStatus::Completed => Some(Notice::new(
            "Processing completed! You can now view the results.",
            Severity::Success,
        )),
        JobStatus::Failed { .. } => Some(Notice::new(
            format!(
                "Processing failed: {}",
                status.failure_reason().unwrap_or_default()
            ),
            Severity::Danger,
        )),
        _ => None,
    }
}

/// Renders a presentation for a job
pub trait PresentationSink: Send + Sync {
    fn render(&self, id: &JobId, presentation: &Presentation);
}

/// Receives every status observation the poll loop acts on
///
/// `reconcile` runs while the job registry is locked and must not call back
/// into the watcher.
pub trait Reconciler: Send + Sync {
    /// Called once when a new poll loop starts for `id`
    fn begin(&self, _id: &JobId) {}

    fn reconcile(&self, id: &JobId, status: &JobStatus);
}

/// Default reconciler: renders through a sink and notifies on terminal states
///
/// Remembers the last presentation per job, so replaying a status renders
/// the same thing again but never repeats a terminal notice. The memory is
/// reset when a new loop begins for the job.
pub struct StatusReconciler {
    sink: Arc<dyn PresentationSink>,
    notifier: Arc<dyn Notifier>,
    rendered: Mutex<HashMap<JobId, Presentation>>,
}

impl StatusReconciler {
    pub fn new(sink: Arc<dyn PresentationSink>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            sink,
            notifier,
            rendered: Mutex::new(HashMap::new()),
        }
    }

    /// Last presentation rendered for a job
    pub fn current(&self, id: &JobId) -> Option<Presentation> {
        self.rendered
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    /// Drops what is remembered about a job
    pub fn forget(&self, id: &JobId) {
        self.rendered
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id);
    }
}

impl Reconciler for StatusReconciler {
    fn begin(&self, id: &JobId) {
        self.forget(id);
    }

    fn reconcile(&self, id: &JobId, status: &JobStatus) {
        let Some(presentation) = Presentation::for_status(status) else {
            return;
        };

        let previous = self
            .rendered
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id.clone(), presentation.clone());
        let changed = previous.as_ref() != Some(&presentation);

        self.sink.render(id, &presentation);

        if !changed {
            debug!("Job {} presentation unchanged ({})", id, presentation.label);
            return;
        }

        if let Some(notice) = terminal_notice(status) {
            notice.send(self.notifier.as_ref());
        }
    }
}
