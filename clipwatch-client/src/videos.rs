//! Video upload and processing trigger endpoints

use std::path::Path;

use clipwatch_core::JobId;
use clipwatch_core::domain::media::{MediaRejection, format_file_size, validate_upload};
use clipwatch_core::dto::action::ActionResponse;
use reqwest::multipart::{Form, Part};
use tracing::{debug, info};

use crate::ProcessingClient;
use crate::error::Result;

impl ProcessingClient {
    /// Upload a video file for later processing
    ///
    /// The file is checked against the service's type and size rules before
    /// any bytes are sent.
    ///
    /// # Arguments
    /// * `path` - Path of the local video file
    ///
    /// # Returns
    /// The service response, carrying the new job id on success
    pub async fn upload_video(&self, path: &Path) -> Result<ActionResponse> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or(MediaRejection::NoFileSelected)?;

        let size = tokio::fs::metadata(path).await?.len();
        validate_upload(&file_name, size)?;

        debug!("Uploading {} ({})", file_name, format_file_size(size));

        let bytes = tokio::fs::read(path).await?;
        let form = Form::new().part("video", Part::bytes(bytes).file_name(file_name.clone()));

        let url = format!("{}/upload", self.base_url);
        let response = self.client.post(&url).multipart(form).send().await?;

        let result: ActionResponse = self.handle_response(response).await?;
        if let Some(id) = result.job_id() {
            info!("Uploaded {} as job {}", file_name, id);
        }
        Ok(result)
    }

    /// Ask the service to start processing a previously uploaded video
    ///
    /// # Arguments
    /// * `id` - The job identifier returned by the upload
    pub async fn trigger_processing(&self, id: &JobId) -> Result<ActionResponse> {
        let url = format!("{}/process/{}", self.base_url, id);
        let response = self.client.post(&url).send().await?;

        self.handle_response(response).await
    }
}
