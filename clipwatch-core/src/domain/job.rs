//! Job domain types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Reason shown when the server reports a failure without saying why
pub const DEFAULT_FAILURE_REASON: &str = "Check server logs";

/// Opaque identifier of a processing job
///
/// Assigned by the server at upload time and never changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for JobId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for JobId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<i64> for JobId {
    fn from(n: i64) -> Self {
        Self(n.to_string())
    }
}

/// Status of a job as observed by one poll
///
/// `Completed` and `Failed` are terminal. `TransportError` is not a job state
/// at all: it records that the status query itself could not be completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum JobStatus {
    Queued,
    Processing { progress: Option<u8> },
    Completed,
    Failed { reason: Option<String> },
    TransportError { message: String },
}

impl JobStatus {
    /// Whether no further transitions are valid from this status
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed { .. })
    }

    /// Whether the job is still waiting or running on the server
    pub fn is_in_progress(&self) -> bool {
        matches!(self, Self::Queued | Self::Processing { .. })
    }

    /// Progress percentage for display; a missing value shows as 0
    pub fn display_progress(&self) -> u8 {
        match self {
            Self::Processing { progress } => progress.unwrap_or(0).min(100),
            Self::Completed => 100,
            _ => 0,
        }
    }

    /// Failure reason for display, falling back to a generic hint
    pub fn failure_reason(&self) -> Option<&str> {
        match self {
            Self::Failed { reason } => Some(
                reason
                    .as_deref()
                    .filter(|r| !r.trim().is_empty())
                    .unwrap_or(DEFAULT_FAILURE_REASON),
            ),
            _ => None,
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Queued => write!(f, "queued"),
            Self::Processing { .. } => write!(f, "processing ({}%)", self.display_progress()),
            Self::Completed => write!(f, "completed"),
            Self::Failed { .. } => write!(f, "failed: {}", self.failure_reason().unwrap_or_default()),
            Self::TransportError { message } => write!(f, "transport error: {}", message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Failed { reason: None }.is_terminal());
        assert!(!JobStatus::Queued.is_terminal());
        assert!(!JobStatus::Processing { progress: Some(99) }.is_terminal());
        assert!(
            !JobStatus::TransportError {
                message: "connection refused".to_string()
            }
            .is_terminal()
        );
    }

    #[test]
    fn test_missing_progress_displays_zero() {
        assert_eq!(JobStatus::Processing { progress: None }.display_progress(), 0);
        assert_eq!(JobStatus::Processing { progress: Some(55) }.display_progress(), 55);
        assert_eq!(JobStatus::Processing { progress: Some(250) }.display_progress(), 100);
    }

    #[test]
    fn test_failure_reason_defaults() {
        let failed = JobStatus::Failed { reason: None };
        assert_eq!(failed.failure_reason(), Some(DEFAULT_FAILURE_REASON));

        let blank = JobStatus::Failed {
            reason: Some("  ".to_string()),
        };
        assert_eq!(blank.failure_reason(), Some(DEFAULT_FAILURE_REASON));

        let explicit = JobStatus::Failed {
            reason: Some("decode error".to_string()),
        };
        assert_eq!(explicit.failure_reason(), Some("decode error"));
        assert_eq!(JobStatus::Completed.failure_reason(), None);
    }

    #[test]
    fn test_job_id_conversions() {
        assert_eq!(JobId::from(42i64).as_str(), "42");
        assert_eq!(JobId::from("v42").to_string(), "v42");
        let json = serde_json::to_string(&JobId::new("v7")).unwrap();
        assert_eq!(json, "\"v7\"");
    }
}
