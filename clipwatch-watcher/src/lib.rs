//! Clipwatch Watcher
//!
//! The status-polling and reconciliation engine.
//!
//! Architecture:
//! - Registry: at most one poll session per job, with cancellation handles
//! - Scheduler: one independent poll loop per job on a fixed cadence
//! - Reconciler: maps observed status to presentation and notices
//! - Controller: upload and trigger flows that start poll loops
//!
//! Hosts drive the engine only through [`JobWatcher::start_poll`] and
//! [`JobWatcher::cancel_poll`], and must cancel on teardown.

pub mod config;
pub mod controller;
pub mod notifier;
pub mod reconciler;
pub mod registry;
pub mod scheduler;

pub use config::WatcherConfig;
pub use notifier::{Notice, Notifier};
pub use reconciler::{Presentation, PresentationSink, Reconciler, StatusReconciler};
pub use registry::{JobRegistry, SessionSnapshot};
pub use scheduler::{JobWatcher, PollOutcome};
