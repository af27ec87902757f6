//! Scheduler layer for the watcher
//!
//! Owns the timing, cancellation and termination of the per-job status
//! poll loops.

pub mod poller;

pub use poller::{JobWatcher, PollOutcome};
