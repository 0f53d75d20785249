//! Environment configuration for the scheduler process.

use std::path::PathBuf;
use std::time::Duration;

use publikasi_core::defaults;

/// Default connection string when `DATABASE_URL` is unset.
pub const DEFAULT_DATABASE_URL: &str = "postgres://localhost/publikasi";

/// Process-level settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub database_url: String,
    pub file_storage_path: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            file_storage_path: PathBuf::from(defaults::FILE_STORAGE_PATH),
        }
    }
}

impl AppConfig {
    /// | Variable | Default |
    /// |----------|---------|
    /// | `DATABASE_URL` | `postgres://localhost/publikasi` |
    /// | `FILE_STORAGE_PATH` | `/var/lib/publikasi/files` |
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let base = Self::default();
        Self {
            database_url: lookup("DATABASE_URL").unwrap_or(base.database_url),
            file_storage_path: lookup("FILE_STORAGE_PATH")
                .map(PathBuf::from)
                .unwrap_or(base.file_storage_path),
        }
    }
}

/// Settings for the notification retention worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetentionConfig {
    /// Whether the purge loop runs at all.
    pub enabled: bool,
    /// Notifications older than this many days are deleted.
    pub retention_days: i64,
    /// Time between purge passes.
    pub interval: Duration,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            retention_days: defaults::NOTIFICATION_RETENTION_DAYS,
            interval: Duration::from_secs(defaults::RETENTION_INTERVAL_SECS),
        }
    }
}

impl RetentionConfig {
    /// Create config from environment variables (with defaults).
    ///
    /// | Variable | Default | Description |
    /// |----------|---------|-------------|
    /// | `RETENTION_ENABLED` | `true` | Enable/disable the purge loop |
    /// | `NOTIFICATION_RETENTION_DAYS` | `7` | Age after which notifications are purged, at most 3650 |
    /// | `RETENTION_INTERVAL_SECS` | `86400` | Seconds between purge passes |
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let base = Self::default();

        let enabled = lookup("RETENTION_ENABLED")
            .map(|v| v != "false" && v != "0")
            .unwrap_or(base.enabled);

        let retention_days = lookup("NOTIFICATION_RETENTION_DAYS")
            .and_then(|v| v.parse::<i64>().ok())
            .filter(|d| *d > 0)
            .map(|d| d.min(defaults::MAX_NOTIFICATION_RETENTION_DAYS))
            .unwrap_or(base.retention_days);

        let interval = lookup("RETENTION_INTERVAL_SECS")
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|s| *s > 0)
            .map(Duration::from_secs)
            .unwrap_or(base.interval);

        Self {
            enabled,
            retention_days,
            interval,
        }
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Clamped to `1..=MAX_NOTIFICATION_RETENTION_DAYS`.
    pub fn with_retention_days(mut self, days: i64) -> Self {
        self.retention_days = days.clamp(1, defaults::MAX_NOTIFICATION_RETENTION_DAYS);
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }
}
