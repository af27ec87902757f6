//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod job;
mod upload;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Subcommand;
use clipwatch_client::ProcessingClient;
use clipwatch_watcher::{JobWatcher, StatusReconciler};

use crate::config::Config;
use crate::console::{ConsoleNotifier, ConsolePresenter};

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Upload a video file
    Upload {
        /// Path of the video (mp4, avi, mov or mkv, at most 500MB)
        file: PathBuf,

        /// Start processing right after the upload and watch it
        #[arg(long)]
        process: bool,
    },
    /// Start processing uploaded videos and watch them
    Process {
        /// Job IDs returned by upload
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Resume watching jobs that are already processing
    Watch {
        /// Job IDs to watch
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Show the current status of a job
    Status {
        /// Job ID
        id: String,
    },
}

/// Everything a command needs to talk to the service and watch jobs
pub struct Session {
    pub client: Arc<ProcessingClient>,
    pub notifier: Arc<ConsoleNotifier>,
    pub watcher: JobWatcher,
}

impl Session {
    /// Creates the client, logs in if credentials were given, and wires the
    /// watcher to the console
    async fn connect(config: &Config) -> Result<Self> {
        let client = Arc::new(
            ProcessingClient::new(config.server_url.clone())
                .context("Failed to create HTTP client")?,
        );

        if let Some(credentials) = &config.credentials {
            client
                .login(&credentials.username, &credentials.password)
                .await
                .context("Login failed")?;
        }

        let notifier = Arc::new(ConsoleNotifier);
        let reconciler = Arc::new(StatusReconciler::new(
            Arc::new(ConsolePresenter),
            notifier.clone(),
        ));
        let watcher = JobWatcher::new(config.watcher.clone(), client.clone(), reconciler);

        Ok(Self {
            client,
            notifier,
            watcher,
        })
    }
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    let session = Session::connect(config).await?;

    match command {
        Commands::Upload { file, process } => upload::handle_upload(&session, &file, process).await,
        Commands::Process { ids } => job::process_jobs(&session, ids).await,
        Commands::Watch { ids } => job::watch_jobs(&session, ids).await,
        Commands::Status { id } => job::show_status(&session, &id).await,
    }
}
