//! Upload and trigger flows
//!
//! One-shot request/response flows that sit in front of the poll loop. A
//! successful trigger is the only way a loop gets started from here.

use std::path::Path;

use clipwatch_client::{ClientError, ProcessingClient};
use clipwatch_core::domain::media::MediaRejection;
use clipwatch_core::dto::action::ActionResponse;
use clipwatch_core::{JobId, Severity};
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::notifier::{Notice, Notifier};
use crate::scheduler::{JobWatcher, PollOutcome};

/// Notice for the result of an upload
pub fn upload_notice(result: &Result<ActionResponse, ClientError>) -> Notice {
    match result {
        Ok(resp) if resp.success => Notice::new(
            "Video uploaded successfully! You can now process it.",
            Severity::Success,
        ),
        Ok(resp) => Notice::new(format!("Upload failed: {}", resp.message), Severity::Danger),
        Err(ClientError::Rejected(MediaRejection::NoFileSelected)) => {
            Notice::new(MediaRejection::NoFileSelected.to_string(), Severity::Warning)
        }
        Err(ClientError::Rejected(rejection)) => {
            Notice::new(rejection.to_string(), Severity::Danger)
        }
        Err(e) => match e.server_message() {
            Some(message) => Notice::new(format!("Upload failed: {}", message), Severity::Danger),
            None => Notice::new(format!("Upload error: {}", e), Severity::Danger),
        },
    }
}

/// Notice for the result of a processing trigger
pub fn trigger_notice(result: &Result<ActionResponse, ClientError>) -> Notice {
    match result {
        Ok(resp) if resp.success => Notice::new(
            "Processing started! Progress will update until it completes.",
            Severity::Info,
        ),
        Ok(resp) => Notice::new(
            format!("Failed to start processing: {}", resp.message),
            Severity::Danger,
        ),
        Err(e) => match e.server_message() {
            Some(message) => Notice::new(
                format!("Failed to start processing: {}", message),
                Severity::Danger,
            ),
            None => Notice::new(format!("Processing error: {}", e), Severity::Danger),
        },
    }
}

/// Uploads a video and reports the result
///
/// Returns the new job's id when the service accepted the file.
pub async fn upload(
    client: &ProcessingClient,
    notifier: &dyn Notifier,
    path: &Path,
) -> Option<JobId> {
    let result = client.upload_video(path).await;
    upload_notice(&result).send(notifier);

    match result {
        Ok(resp) if resp.success => resp.job_id(),
        Ok(_) => None,
        Err(e) => {
            error!("Upload of {} failed: {}", path.display(), e);
            None
        }
    }
}

/// Triggers processing of a job and starts watching it on success
///
/// Returns the poll loop handle, or `None` if the trigger failed or the job
/// is already being watched. A watched job is not triggered again.
pub async fn trigger(
    client: &ProcessingClient,
    watcher: &JobWatcher,
    notifier: &dyn Notifier,
    id: JobId,
) -> Option<JoinHandle<PollOutcome>> {
    if watcher.is_active(&id) {
        debug!("Job {} is already processing, not triggering again", id);
        return None;
    }

    let result = client.trigger_processing(&id).await;
    trigger_notice(&result).send(notifier);

    match result {
        Ok(resp) if resp.success => {
            info!("Processing of job {} started", id);
            watcher.start_poll(id)
        }
        Ok(resp) => {
            error!("Service refused to process job {}: {}", id, resp.message);
            None
        }
        Err(e) => {
            error!("Failed to trigger job {}: {}", id, e);
            None
        }
    }
}
