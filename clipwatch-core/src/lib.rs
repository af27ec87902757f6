//! Clipwatch Core
//!
//! Core types and abstractions shared by the clipwatch client, watcher and CLI.
//!
//! This crate contains:
//! - Domain types: job identifiers, job status, notice severity, media rules
//! - DTOs: wire payloads exchanged with the processing service
//! - The `StatusFetcher` seam consumed by the poll loop

pub mod domain;
pub mod dto;
pub mod fetch;

pub use domain::job::{JobId, JobStatus};
pub use domain::notice::Severity;
pub use fetch::StatusFetcher;
