//! Watcher configuration
//!
//! Defines the polling cadence and the lifetime ceiling of a poll loop.

use std::time::Duration;

/// Default time between two status queries for one job
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Default number of ticks before a loop gives up (30 minutes at 3 s)
pub const DEFAULT_MAX_TICKS: u32 = 600;

/// Poll loop configuration
///
/// The ceiling is counted in ticks rather than wall time so that it scales
/// with the interval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatcherConfig {
    /// How often each active job is polled
    pub poll_interval: Duration,

    /// Maximum number of status queries per loop before it times out
    pub max_ticks: u32,
}

impl WatcherConfig {
    /// Creates a configuration with explicit values
    pub fn new(poll_interval: Duration, max_ticks: u32) -> Self {
        Self {
            poll_interval,
            max_ticks,
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Recognised environment variables:
    /// - CLIPWATCH_POLL_INTERVAL (optional, seconds, default: 3)
    /// - CLIPWATCH_MAX_TICKS (optional, default: 600)
    ///
    /// Values that are present but unparsable are reported as errors rather
    /// than silently replaced by defaults.
    pub fn from_env() -> anyhow::Result<Self> {
        let poll_interval = match std::env::var("CLIPWATCH_POLL_INTERVAL") {
            Ok(s) => Duration::from_secs(s.trim().parse::<u64>().map_err(|e| {
                anyhow::anyhow!("CLIPWATCH_POLL_INTERVAL must be whole seconds: {}", e)
            })?),
            Err(_) => DEFAULT_POLL_INTERVAL,
        };

        let max_ticks = match std::env::var("CLIPWATCH_MAX_TICKS") {
            Ok(s) => s
                .trim()
                .parse::<u32>()
                .map_err(|e| anyhow::anyhow!("CLIPWATCH_MAX_TICKS must be a number: {}", e))?,
            Err(_) => DEFAULT_MAX_TICKS,
        };

        Ok(Self {
            poll_interval,
            max_ticks,
        })
    }

    /// Overrides the poll interval
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Overrides the tick ceiling
    pub fn with_max_ticks(mut self, max_ticks: u32) -> Self {
        self.max_ticks = max_ticks;
        self
    }

    /// Total time a loop may run before timing out
    pub fn lifetime(&self) -> Duration {
        self.poll_interval.saturating_mul(self.max_ticks)
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.poll_interval.is_zero() {
            anyhow::bail!("poll_interval must be greater than 0");
        }

        if self.max_ticks == 0 {
            anyhow::bail!("max_ticks must be greater than 0");
        }

        Ok(())
    }
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_INTERVAL, DEFAULT_MAX_TICKS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = WatcherConfig::default();
        assert_eq!(config.poll_interval, Duration::from_secs(3));
        assert_eq!(config.max_ticks, 600);
        assert_eq!(config.lifetime(), Duration::from_secs(30 * 60));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = WatcherConfig::default();
        assert!(config.validate().is_ok());

        config.poll_interval = Duration::ZERO;
        assert!(config.validate().is_err());

        config.poll_interval = Duration::from_millis(500);
        assert!(config.validate().is_ok());

        config.max_ticks = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_builder_overrides() {
        let config = WatcherConfig::default()
            .with_poll_interval(Duration::from_secs(1))
            .with_max_ticks(10);

        assert_eq!(config.poll_interval, Duration::from_secs(1));
        assert_eq!(config.max_ticks, 10);
        assert_eq!(config.lifetime(), Duration::from_secs(10));
    }
}
