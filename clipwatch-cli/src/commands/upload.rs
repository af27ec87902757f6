//! Upload command handler

use std::path::Path;

use anyhow::Result;
use clipwatch_watcher::controller;

use super::Session;
use super::job::wait_for_jobs;

/// Upload a file, optionally triggering and watching its processing
pub async fn handle_upload(session: &Session, file: &Path, process: bool) -> Result<()> {
    let Some(id) = controller::upload(&session.client, session.notifier.as_ref(), file).await
    else {
        anyhow::bail!("Upload of {} did not succeed", file.display());
    };

    println!("Job ID: {}", id);

    if !process {
        return Ok(());
    }

    let handle = controller::trigger(
        &session.client,
        &session.watcher,
        session.notifier.as_ref(),
        id.clone(),
    )
    .await;

    match handle {
        Some(handle) => wait_for_jobs(&session.watcher, vec![(id, handle)]).await,
        None => anyhow::bail!("Processing of job {} was not started", id),
    }
}
