//! Configuration for the background publishing worker.

use std::time::Duration;

use blogcraft_pipeline::DEFAULT_JOB_INTERVAL;

/// Worker configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerConfig {
    /// Period of the platform publisher (`PUBLISH_INTERVAL_SECS`).
    pub publish_interval: Duration,
    /// Period of the scheduled-post processor (`SCHEDULED_INTERVAL_SECS`).
    pub scheduled_interval: Duration,
    /// Set `DISABLE_PLATFORM_PUBLISHER=1` to run only the local processor,
    /// e.g. when no blog platform credentials are available.
    pub platform_publisher_enabled: bool,
}

impl WorkerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                      | Default |
    /// |------------------------------|---------|
    /// | `PUBLISH_INTERVAL_SECS`      | `60`    |
    /// | `SCHEDULED_INTERVAL_SECS`    | `60`    |
    /// | `DISABLE_PLATFORM_PUBLISHER` | unset   |
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let interval = |key: &str| {
            lookup(key)
                .map(|raw| {
                    let secs: u64 = raw
                        .trim()
                        .parse()
                        .unwrap_or_else(|_| panic!("{key} must be a whole number of seconds"));
                    assert!(secs > 0, "{key} must be greater than zero");
                    Duration::from_secs(secs)
                })
                .unwrap_or(DEFAULT_JOB_INTERVAL)
        };

        let disabled = lookup("DISABLE_PLATFORM_PUBLISHER")
            .map(|v| matches!(v.trim(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Self {
            publish_interval: interval("PUBLISH_INTERVAL_SECS"),
            scheduled_interval: interval("SCHEDULED_INTERVAL_SECS"),
            platform_publisher_enabled: !disabled,
        }
    }
}
