//! Clipwatch CLI
//!
//! Command-line host for the clipwatch engine: uploads videos, triggers
//! processing and follows each job until it finishes.

mod commands;
mod config;
mod console;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Used when `RUST_LOG` is unset; covers every `clipwatch*` crate
const DEFAULT_LOG_FILTER: &str = "clipwatch=info";

#[derive(Parser)]
#[command(name = "clipwatch")]
#[command(about = "Upload videos, trigger processing and watch progress", long_about = None)]
struct Cli {
    /// Processing service URL
    #[arg(long, env = "CLIPWATCH_URL", default_value = "http://localhost:5000")]
    url: String,

    /// Username to log in with
    #[arg(long, env = "CLIPWATCH_USERNAME", requires = "password")]
    username: Option<String>,

    /// Password to log in with
    #[arg(long, env = "CLIPWATCH_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Seconds between status polls
    #[arg(long, global = true)]
    interval: Option<u64>,

    /// Number of polls before giving up on a job
    #[arg(long, global = true)]
    max_ticks: Option<u32>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config::from_args(
        cli.url,
        cli.username.zip(cli.password),
        cli.interval,
        cli.max_ticks,
    )?;

    handle_command(cli.command, &config).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_filter_parses() {
        assert!(EnvFilter::try_new(DEFAULT_LOG_FILTER).is_ok());
    }

    #[test]
    fn test_cli_parses_process_with_flags() {
        let cli = Cli::try_parse_from([
            "clipwatch",
            "--url",
            "http://media:5000",
            "process",
            "5",
            "6",
            "--interval",
            "1",
        ])
        .unwrap();
        assert_eq!(cli.url, "http://media:5000");
        assert_eq!(cli.interval, Some(1));
        assert!(matches!(cli.command, Commands::Process { ref ids } if ids.len() == 2));
    }
}
