//! Configuration module
//!
//! Combines command-line flags with the watcher's environment settings.

use std::time::Duration;

use anyhow::{Context, Result};
use clipwatch_watcher::WatcherConfig;

/// Login credentials
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// URL of the processing service
    pub server_url: String,

    /// Credentials to log in with before any other request
    pub credentials: Option<Credentials>,

    /// Poll loop settings
    pub watcher: WatcherConfig,
}

impl Config {
    /// Builds the configuration; flags override environment settings
    pub fn from_args(
        server_url: String,
        credentials: Option<(String, String)>,
        interval: Option<u64>,
        max_ticks: Option<u32>,
    ) -> Result<Self> {
        if !server_url.starts_with("http://") && !server_url.starts_with("https://") {
            anyhow::bail!("server URL must start with http:// or https://");
        }

        let mut watcher =
            WatcherConfig::from_env().context("Invalid watcher settings in environment")?;
        if let Some(secs) = interval {
            watcher = watcher.with_poll_interval(Duration::from_secs(secs));
        }
        if let Some(ticks) = max_ticks {
            watcher = watcher.with_max_ticks(ticks);
        }
        watcher.validate()?;

        Ok(Self {
            server_url,
            credentials: credentials.map(|(username, password)| Credentials { username, password }),
            watcher,
        })
    }
}
