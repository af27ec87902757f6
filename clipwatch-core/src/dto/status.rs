//! Status query payloads

use serde::{Deserialize, Serialize};

use crate::domain::job::JobStatus;

/// Discriminator of a status payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusKind {
    /// Reported for jobs the server has not started yet
    Pending,
    Queued,
    Processing,
    Completed,
    Failed,
}

/// Body of `GET /status/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusPayload {
    pub status: StatusKind,
    #[serde(default)]
    pub progress: Option<f64>,
    #[serde(default)]
    pub error: Option<String>,
    /// Per-class detection counts, present once processing completed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counts: Option<serde_json::Value>,
}

impl From<StatusPayload> for JobStatus {
    fn from(payload: StatusPayload) -> Self {
        match payload.status {
            StatusKind::Pending | StatusKind::Queued => JobStatus::Queued,
            StatusKind::Processing => JobStatus::Processing {
                progress: payload
                    .progress
                    .filter(|p| p.is_finite())
                    .map(|p| p.round().clamp(0.0, 100.0) as u8),
            },
            StatusKind::Completed => JobStatus::Completed,
            StatusKind::Failed => JobStatus::Failed {
                reason: payload.error,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> JobStatus {
        serde_json::from_str::<StatusPayload>(json).unwrap().into()
    }

    #[test]
    fn test_pending_maps_to_queued() {
        assert_eq!(parse(r#"{"status":"pending","progress":0}"#), JobStatus::Queued);
    }

    #[test]
    fn test_processing_progress() {
        assert_eq!(
            parse(r#"{"status":"processing","progress":55}"#),
            JobStatus::Processing { progress: Some(55) }
        );
        assert_eq!(
            parse(r#"{"status":"processing"}"#),
            JobStatus::Processing { progress: None }
        );
        assert_eq!(
            parse(r#"{"status":"processing","progress":140}"#),
            JobStatus::Processing { progress: Some(100) }
        );
    }

    #[test]
    fn test_failed_carries_reason() {
        assert_eq!(
            parse(r#"{"status":"failed","progress":0,"error":"decode error"}"#),
            JobStatus::Failed {
                reason: Some("decode error".to_string())
            }
        );
        assert_eq!(
            parse(r#"{"status":"failed","progress":0}"#),
            JobStatus::Failed { reason: None }
        );
    }

    #[test]
    fn test_completed_keeps_counts() {
        let payload: StatusPayload = serde_json::from_str(
            r#"{"status":"completed","progress":100,"counts":{"car":12,"truck":3}}"#,
        )
        .unwrap();
        assert_eq!(payload.counts.as_ref().unwrap()["car"], 12);
        assert_eq!(JobStatus::from(payload), JobStatus::Completed);
    }

    #[test]
    fn test_unknown_discriminator_is_rejected() {
        assert!(serde_json::from_str::<StatusPayload>(r#"{"status":"exploded"}"#).is_err());
    }
}
