//! Job command handlers
//!
//! Triggering, watching and one-shot status queries.

use anyhow::{Context, Result};
use clipwatch_core::{JobId, JobStatus};
use clipwatch_watcher::{JobWatcher, PollOutcome, controller};
use colored::*;
use tokio::task::JoinHandle;
use tracing::warn;

use super::Session;

/// Trigger processing for each job, then watch the ones that started
pub async fn process_jobs(session: &Session, ids: Vec<String>) -> Result<()> {
    let mut handles = Vec::new();

    for id in ids.into_iter().map(JobId::from) {
        if let Some(handle) = controller::trigger(
            &session.client,
            &session.watcher,
            session.notifier.as_ref(),
            id.clone(),
        )
        .await
        {
            handles.push((id, handle));
        }
    }

    if handles.is_empty() {
        anyhow::bail!("No job was started");
    }

    wait_for_jobs(&session.watcher, handles).await
}

/// Resume watching jobs without triggering them again
pub async fn watch_jobs(session: &Session, ids: Vec<String>) -> Result<()> {
    let mut handles = Vec::new();

    for id in ids.into_iter().map(JobId::from) {
        match session.watcher.start_poll(id.clone()) {
            Some(handle) => handles.push((id, handle)),
            None => println!("{}", format!("Job {} listed twice, watching once", id).yellow()),
        }
    }

    wait_for_jobs(&session.watcher, handles).await
}

/// Print the current status of one job
pub async fn show_status(session: &Session, id: &str) -> Result<()> {
    let id = JobId::from(id);
    let payload = session
        .client
        .get_status(&id)
        .await
        .with_context(|| format!("Failed to query status of job {}", id))?;

    let counts = payload.counts.clone();
    let status = JobStatus::from(payload);

    println!("{}", format!("Job {}", id).bold());
    println!("  Status: {}", status);

    if let Some(counts) = counts {
        println!("  Counts:");
        println!("{}", serde_json::to_string_pretty(&counts)?);
    }

    Ok(())
}

/// Wait for every poll loop to end, cancelling all of them on Ctrl-C
///
/// Fails if any job failed.
pub async fn wait_for_jobs(
    watcher: &JobWatcher,
    handles: Vec<(JobId, JoinHandle<PollOutcome>)>,
) -> Result<()> {
    let interrupt = {
        let watcher = watcher.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted, stopping all watchers");
                watcher.cancel_all();
            }
        })
    };

    let mut failed = 0;
    println!(
        "Watching {} job(s), giving up after {:?}",
        handles.len(),
        watcher.config().lifetime()
    );
    for (id, handle) in handles {
        let outcome = handle.await.context("Poll loop panicked")?;
        print_outcome(&id, &outcome);
        if matches!(outcome, PollOutcome::Failed { .. }) {
            failed += 1;
        }
    }

    interrupt.abort();

    if failed > 0 {
        anyhow::bail!("{} job(s) failed", failed);
    }
    Ok(())
}

fn print_outcome(id: &JobId, outcome: &PollOutcome) {
    let line = match outcome {
        PollOutcome::Completed => "completed".green(),
        PollOutcome::Failed { reason } => format!("failed: {}", reason).red(),
        PollOutcome::TimedOut { last_status } => format!(
            "still running after the watch limit (last seen: {})",
            last_status
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_else(|| "nothing".to_string())
        )
        .yellow(),
        PollOutcome::Cancelled => "no longer watched".yellow(),
    };
    println!("{} {}", format!("Job {}:", id).bold(), line);
}
