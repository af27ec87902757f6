//! Status query endpoint

use async_trait::async_trait;
use clipwatch_core::dto::status::StatusPayload;
use clipwatch_core::{JobId, JobStatus, StatusFetcher};
use tracing::debug;

use crate::ProcessingClient;
use crate::error::Result;

impl ProcessingClient {
    /// Get the raw processing status of a job
    ///
    /// # Arguments
    /// * `id` - The job identifier
    ///
    /// # Returns
    /// The status payload as reported by the service
    pub async fn get_status(&self, id: &JobId) -> Result<StatusPayload> {
        let url = format!("{}/status/{}", self.base_url, id);
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }
}

#[async_trait]
impl StatusFetcher for ProcessingClient {
    async fn fetch(&self, id: &JobId) -> JobStatus {
        match self.get_status(id).await {
            Ok(payload) => payload.into(),
            Err(e) => {
                debug!("Status query for job {} did not complete: {}", id, e);
                JobStatus::TransportError {
                    message: e.to_string(),
                }
            }
        }
    }
}
