//! Job registry
//!
//! Tracks which jobs currently have a poll loop and guarantees at most one
//! loop per job. Every session gets its own id, so a loop that outlived its
//! session (cancelled, then restarted for the same job) can tell that its
//! results are stale and must be dropped.
//!
//! The map is only touched in short synchronous sections; the lock is never
//! held across an `.await`.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use clipwatch_core::{JobId, JobStatus};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Runtime record of one active poll loop
#[derive(Debug)]
struct PollSession {
    session_id: Uuid,
    cancel: CancellationToken,
    started_at: DateTime<Utc>,
    last_status: Option<JobStatus>,
    ticks: u32,
}

impl PollSession {
    fn new() -> Self {
        Self {
            session_id: Uuid::new_v4(),
            cancel: CancellationToken::new(),
            started_at: Utc::now(),
            last_status: None,
            ticks: 0,
        }
    }

    fn snapshot(&self, job_id: &JobId) -> SessionSnapshot {
        SessionSnapshot {
            job_id: job_id.clone(),
            session_id: self.session_id,
            started_at: self.started_at,
            last_status: self.last_status.clone(),
            ticks: self.ticks,
        }
    }
}

/// What a freshly registered loop needs to run
#[derive(Debug, Clone)]
pub struct SessionTicket {
    pub session_id: Uuid,
    pub cancel: CancellationToken,
}

/// Read-only copy of a session's state
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub job_id: JobId,
    pub session_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub last_status: Option<JobStatus>,
    pub ticks: u32,
}

/// Mapping from job id to its single active poll session
#[derive(Debug, Default)]
pub struct JobRegistry {
    sessions: Mutex<HashMap<JobId, PollSession>>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn sessions(&self) -> MutexGuard<'_, HashMap<JobId, PollSession>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Creates a session for `id` unless one is already active
    pub fn try_register(&self, id: &JobId) -> Option<SessionTicket> {
        let mut sessions = self.sessions();
        if sessions.contains_key(id) {
            return None;
        }

        let session = PollSession::new();
        let ticket = SessionTicket {
            session_id: session.session_id,
            cancel: session.cancel.clone(),
        };
        sessions.insert(id.clone(), session);
        Some(ticket)
    }

    /// Returns true if a new session was created, false if one already existed
    pub fn register(&self, id: &JobId) -> bool {
        self.try_register(id).is_some()
    }

    /// Removes the session for `id` and stops its loop
    ///
    /// Safe to call for ids that are not registered. Returns whether a
    /// session was removed.
    pub fn unregister(&self, id: &JobId) -> bool {
        let removed = self.sessions().remove(id);
        match removed {
            Some(session) => {
                session.cancel.cancel();
                true
            }
            None => false,
        }
    }

    /// Removes every session, stopping all loops; returns how many there were
    pub fn unregister_all(&self) -> usize {
        let drained: Vec<PollSession> = self.sessions().drain().map(|(_, s)| s).collect();
        for session in &drained {
            session.cancel.cancel();
        }
        drained.len()
    }

    pub fn is_active(&self, id: &JobId) -> bool {
        self.sessions().contains_key(id)
    }

    /// Counts one tick for the session; false if the session is gone
    pub(crate) fn record_tick(&self, id: &JobId, session_id: Uuid) -> bool {
        match self.sessions().get_mut(id) {
            Some(s) if s.session_id == session_id => {
                s.ticks += 1;
                true
            }
            _ => false,
        }
    }

    /// Records an observation and runs `apply` if `session_id` is still live
    ///
    /// The map stays locked while `apply` runs, so an `unregister` either
    /// lands before (and `apply` is skipped) or waits until it is done.
    /// `apply` must not call back into the registry. A terminal status also
    /// removes the session. Returns `None` for a stale session.
    pub(crate) fn observe<R>(
        &self,
        id: &JobId,
        session_id: Uuid,
        status: &JobStatus,
        apply: impl FnOnce() -> R,
    ) -> Option<R> {
        let mut sessions = self.sessions();
        let session = sessions
            .get_mut(id)
            .filter(|s| s.session_id == session_id)?;
        session.last_status = Some(status.clone());

        let result = apply();

        if status.is_terminal() {
            if let Some(session) = sessions.remove(id) {
                session.cancel.cancel();
            }
        }
        Some(result)
    }

    /// Removes the session only if it is still `session_id`
    ///
    /// Returns the final snapshot of the removed session.
    pub(crate) fn release(&self, id: &JobId, session_id: Uuid) -> Option<SessionSnapshot> {
        let mut sessions = self.sessions();
        if !sessions.get(id).is_some_and(|s| s.session_id == session_id) {
            return None;
        }
        let session = sessions.remove(id)?;
        drop(sessions);

        session.cancel.cancel();
        Some(session.snapshot(id))
    }

    pub fn snapshot(&self, id: &JobId) -> Option<SessionSnapshot> {
        self.sessions().get(id).map(|s| s.snapshot(id))
    }

    /// Ids of all active sessions, sorted
    pub fn active_jobs(&self) -> Vec<JobId> {
        let mut ids: Vec<JobId> = self.sessions().keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.sessions().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_register_is_idempotent() {
        let registry = JobRegistry::new();
        let id = JobId::from("v1");

        assert!(registry.register(&id));
        assert!(!registry.register(&id));
        assert!(registry.is_active(&id));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_unregister_absent_is_noop() {
        let registry = JobRegistry::new();
        let id = JobId::from("v1");

        assert!(!registry.unregister(&id));
        assert!(registry.register(&id));
        assert!(registry.unregister(&id));
        assert!(!registry.unregister(&id));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_unregister_cancels_loop_token() {
        let registry = JobRegistry::new();
        let id = JobId::from("v1");

        let ticket = registry.try_register(&id).unwrap();
        assert!(!ticket.cancel.is_cancelled());

        registry.unregister(&id);
        assert!(ticket.cancel.is_cancelled());
    }

    #[test]
    fn test_stale_session_cannot_touch_new_one() {
        let registry = JobRegistry::new();
        let id = JobId::from("v1");

        let old = registry.try_register(&id).unwrap();
        registry.unregister(&id);
        let new = registry.try_register(&id).unwrap();

        assert!(!registry.record_tick(&id, old.session_id));
        let mut applied = false;
        assert!(
            registry
                .observe(&id, old.session_id, &JobStatus::Completed, || applied = true)
                .is_none()
        );
        assert!(!applied);
        assert!(registry.release(&id, old.session_id).is_none());

        assert!(registry.record_tick(&id, new.session_id));
        assert!(registry.is_active(&id));
    }

    #[test]
    fn test_observe_tracks_ticks_and_status() {
        let registry = JobRegistry::new();
        let id = JobId::from("v1");
        let ticket = registry.try_register(&id).unwrap();

        assert!(registry.record_tick(&id, ticket.session_id));
        assert!(registry.record_tick(&id, ticket.session_id));
        let status = JobStatus::Processing { progress: Some(40) };
        assert_eq!(registry.observe(&id, ticket.session_id, &status, || 7), Some(7));

        let snapshot = registry.snapshot(&id).unwrap();
        assert_eq!(snapshot.ticks, 2);
        assert_eq!(snapshot.last_status, Some(status.clone()));

        let released = registry.release(&id, ticket.session_id).unwrap();
        assert_eq!(released.last_status, Some(status));
        assert!(registry.snapshot(&id).is_none());
    }

    #[test]
    fn test_terminal_observation_removes_session() {
        let registry = JobRegistry::new();
        let id = JobId::from("v1");
        let ticket = registry.try_register(&id).unwrap();

        let status = JobStatus::Failed { reason: None };
        assert!(registry.observe(&id, ticket.session_id, &status, || ()).is_some());
        assert!(!registry.is_active(&id));
        assert!(ticket.cancel.is_cancelled());
    }

    #[test]
    fn test_unregister_waits_for_observation() {
        let registry = JobRegistry::new();
        let id = JobId::from("v1");
        let ticket = registry.try_register(&id).unwrap();
        let applied = AtomicBool::new(false);
        let status = JobStatus::Processing { progress: Some(10) };

        thread::scope(|scope| {
            let canceller = registry
                .observe(&id, ticket.session_id, &status, || {
                    let canceller = scope.spawn(|| {
                        assert!(registry.unregister(&id));
                        applied.load(Ordering::SeqCst)
                    });
                    thread::sleep(Duration::from_millis(20));
                    applied.store(true, Ordering::SeqCst);
                    canceller
                })
                .unwrap();

            // The cancel only went through once the observation was applied.
            assert!(canceller.join().unwrap());
        });
        assert!(registry.is_empty());
    }

    #[test]
    fn test_unregister_all() {
        let registry = JobRegistry::new();
        registry.register(&JobId::from("b"));
        registry.register(&JobId::from("a"));

        assert_eq!(registry.active_jobs(), vec![JobId::from("a"), JobId::from("b")]);
        assert_eq!(registry.unregister_all(), 2);
        assert!(registry.is_empty());
    }
}
