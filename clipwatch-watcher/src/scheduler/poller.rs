//! Job status poller
//!
//! Runs one independent poll loop per job. Each loop queries the status
//! endpoint on a fixed cadence, hands every meaningful observation to the
//! reconciler, and stops on completion, failure, cancellation or when the
//! tick ceiling is reached.

use std::sync::Arc;

use clipwatch_core::{JobId, JobStatus, StatusFetcher};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::config::WatcherConfig;
use crate::reconciler::Reconciler;
use crate::registry::{JobRegistry, SessionTicket};

/// How a poll loop ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    Completed,
    Failed { reason: String },
    /// The ceiling was reached; the job may still be running server-side
    TimedOut { last_status: Option<JobStatus> },
    Cancelled,
}

/// Polls the processing service for every job it is asked to watch
///
/// Cheap to clone; clones share the same registry.
#[derive(Clone)]
pub struct JobWatcher {
    inner: Arc<WatcherInner>,
}

struct WatcherInner {
    config: WatcherConfig,
    registry: JobRegistry,
    fetcher: Arc<dyn StatusFetcher>,
    reconciler: Arc<dyn Reconciler>,
}

impl JobWatcher {
    /// Creates a new watcher with an empty registry
    pub fn new(
        config: WatcherConfig,
        fetcher: Arc<dyn StatusFetcher>,
        reconciler: Arc<dyn Reconciler>,
    ) -> Self {
        Self {
            inner: Arc::new(WatcherInner {
                config,
                registry: JobRegistry::new(),
                fetcher,
                reconciler,
            }),
        }
    }

    pub fn config(&self) -> &WatcherConfig {
        &self.inner.config
    }

    pub fn registry(&self) -> &JobRegistry {
        &self.inner.registry
    }

    /// Starts watching a job
    ///
    /// Returns `None` without starting anything if the job is already being
    /// watched. Must be called from within a tokio runtime.
    pub fn start_poll(&self, id: JobId) -> Option<JoinHandle<PollOutcome>> {
        let Some(ticket) = self.inner.registry.try_register(&id) else {
            debug!("Job {} is already being watched", id);
            return None;
        };
        self.inner.reconciler.begin(&id);

        let inner = Arc::clone(&self.inner);
        Some(tokio::spawn(async move { inner.run_session(id, ticket).await }))
    }

    /// Stops watching a job; results still in flight are discarded
    pub fn cancel_poll(&self, id: &JobId) -> bool {
        let cancelled = self.inner.registry.unregister(id);
        if cancelled {
            info!("Stopped watching job {}", id);
        }
        cancelled
    }

    /// Stops every loop, e.g. when the host is shutting down
    pub fn cancel_all(&self) -> usize {
        let cancelled = self.inner.registry.unregister_all();
        if cancelled > 0 {
            info!("Stopped watching {} job(s)", cancelled);
        }
        cancelled
    }

    pub fn is_active(&self, id: &JobId) -> bool {
        self.inner.registry.is_active(id)
    }
}

impl WatcherInner {
    /// Runs one poll loop until a terminal state
    async fn run_session(&self, id: JobId, ticket: SessionTicket) -> PollOutcome {
        let period = self.config.poll_interval;
        info!(
            "Watching job {} (interval: {:?}, max ticks: {})",
            id, period, self.config.max_ticks
        );

        // First query one full interval after start.
        let mut ticker = time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        for tick in 1..=self.config.max_ticks {
            tokio::select! {
                biased;
                _ = ticket.cancel.cancelled() => return self.cancelled(&id),
                _ = ticker.tick() => {}
            }

            if !self.registry.record_tick(&id, ticket.session_id) {
                return self.cancelled(&id);
            }

            let status = tokio::select! {
                biased;
                _ = ticket.cancel.cancelled() => return self.cancelled(&id),
                status = self.fetcher.fetch(&id) => status,
            };

            if let JobStatus::TransportError { message } = &status {
                warn!(
                    "Status poll {} for job {} failed, retrying: {}",
                    tick, id, message
                );
                continue;
            }

            // A result for a session that is no longer registered is stale.
            let applied = self.registry.observe(&id, ticket.session_id, &status, || {
                self.reconciler.reconcile(&id, &status)
            });
            if applied.is_none() {
                debug!("Discarding late status for job {}: {}", id, status);
                return self.cancelled(&id);
            }

            match &status {
                JobStatus::Completed => {
                    info!("Job {} completed after {} poll(s)", id, tick);
                    return PollOutcome::Completed;
                }
                JobStatus::Failed { .. } => {
                    let reason = status.failure_reason().unwrap_or_default().to_string();
                    warn!("Job {} failed: {}", id, reason);
                    return PollOutcome::Failed { reason };
                }
                _ => debug!("Job {} tick {}: {}", id, tick, status),
            }
        }

        let last_status = self
            .registry
            .release(&id, ticket.session_id)
            .and_then(|snapshot| snapshot.last_status);
        info!(
            "Gave up watching job {} after {} poll(s); last status: {}",
            id,
            self.config.max_ticks,
            last_status
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_else(|| "unknown".to_string())
        );
        PollOutcome::TimedOut { last_status }
    }

    fn cancelled(&self, id: &JobId) -> PollOutcome {
        debug!("Poll loop for job {} cancelled", id);
        PollOutcome::Cancelled
    }
}
