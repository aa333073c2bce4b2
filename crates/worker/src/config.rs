//! Worker configuration loaded from environment variables.

use std::time::Duration;

use turn_notify_db::DEFAULT_MAX_CONNECTIONS;
use turn_notify_events::FcmConfig;

/// Default interval between task queue polls.
const DEFAULT_POLL_INTERVAL_MS: u64 = 500;

/// Default age after which a running task is considered abandoned.
const DEFAULT_STALE_AFTER_SECS: u64 = 300;

/// A required variable was missing or empty.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),
}

/// Runtime configuration for the worker process.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub database_url: String,
    /// Pool size (default: `10`).
    pub max_connections: u32,
    pub fcm: FcmConfig,
    /// Task queue poll interval (default: 500 ms).
    pub poll_interval: Duration,
    /// Running tasks older than this are requeued (default: 300 s).
    pub stale_after: Duration,
}

impl WorkerConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable                   | Required | Default |
    /// |----------------------------|----------|---------|
    /// | `DATABASE_URL`             | yes      | --      |
    /// | `DATABASE_MAX_CONNECTIONS` | no       | `10`    |
    /// | `FCM_SERVER_KEY`           | yes      | --      |
    /// | `FCM_ENDPOINT`             | no       | FCM send URL |
    /// | `FCM_REQUEST_TIMEOUT_SECS` | no       | `10`    |
    /// | `TASK_POLL_INTERVAL_MS`    | no       | `500`   |
    /// | `TASK_STALE_AFTER_SECS`    | no       | `300`   |
    ///
    /// Numeric values that fail to parse fall back to their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) but reading through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let fcm = FcmConfig::from_lookup(&lookup).ok_or(ConfigError::Missing("FCM_SERVER_KEY"))?;

        Ok(Self {
            database_url,
            max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS),
            fcm,
            poll_interval: Duration::from_millis(parse_or(
                &lookup,
                "TASK_POLL_INTERVAL_MS",
                DEFAULT_POLL_INTERVAL_MS,
            )),
            stale_after: Duration::from_secs(parse_or(
                &lookup,
                "TASK_STALE_AFTER_SECS",
                DEFAULT_STALE_AFTER_SECS,
            )),
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> T {
    lookup(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_matches::assert_matches;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<WorkerConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        WorkerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_only_required_vars_are_set() {
        let config = load(&[
            ("DATABASE_URL", "postgres://localhost/turns"),
            ("FCM_SERVER_KEY", "secret"),
        ])
        .unwrap();

        assert_eq!(config.database_url, "postgres://localhost/turns");
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.fcm.server_key, "secret");
        assert_eq!(config.poll_interval, Duration::from_millis(500));
        assert_eq!(config.stale_after, Duration::from_secs(300));
    }

    #[test]
    fn overrides_are_parsed() {
        let config = load(&[
            ("DATABASE_URL", "postgres://localhost/turns"),
            ("FCM_SERVER_KEY", "secret"),
            ("DATABASE_MAX_CONNECTIONS", "3"),
            ("TASK_POLL_INTERVAL_MS", "50"),
            ("TASK_STALE_AFTER_SECS", "not-a-number"),
        ])
        .unwrap();

        assert_eq!(config.max_connections, 3);
        assert_eq!(config.poll_interval, Duration::from_millis(50));
        assert_eq!(config.stale_after, Duration::from_secs(300));
    }

    #[test]
    fn missing_database_url_is_an_error() {
        assert_matches!(
            load(&[("FCM_SERVER_KEY", "secret")]),
            Err(ConfigError::Missing("DATABASE_URL"))
        );
    }

    #[test]
    fn missing_server_key_is_an_error() {
        let err = load(&[("DATABASE_URL", "postgres://localhost/turns")]).unwrap_err();
        assert_eq!(err.to_string(), "FCM_SERVER_KEY environment variable is required");
    }
}
