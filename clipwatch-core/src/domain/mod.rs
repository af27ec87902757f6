//! Core domain types
//!
//! These types describe a processing job as the client observes it. They are
//! shared between the HTTP client (which produces them) and the watcher (which
//! reacts to them).

pub mod job;
pub mod media;
pub mod notice;
