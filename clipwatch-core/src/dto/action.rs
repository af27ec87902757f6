//! Upload, trigger and login payloads

use serde::{Deserialize, Serialize};

use crate::domain::job::JobId;

/// Envelope returned by `/upload`, `/process/{id}` and failed requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_id: Option<i64>,
}

impl ActionResponse {
    /// Job identifier assigned by the server, if the response carries one
    pub fn job_id(&self) -> Option<JobId> {
        self.video_id.map(JobId::from)
    }
}

/// Form body of `POST /login`
#[derive(Debug, Clone, Serialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}
