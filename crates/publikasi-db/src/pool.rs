//! PostgreSQL pool setup for the catalog repositories.

use std::time::{Duration, Instant};

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::{debug, info, warn};

use publikasi_core::{Error, Result};

/// Catalog traffic is short queries; a small pool is enough for one process.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

pub const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 30;

/// Connections idle this long are closed.
const IDLE_TIMEOUT: Duration = Duration::from_secs(600);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    pub max_connections: u32,
    /// How long a repository call waits for a free connection.
    pub acquire_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: DEFAULT_MAX_CONNECTIONS,
            acquire_timeout: Duration::from_secs(DEFAULT_ACQUIRE_TIMEOUT_SECS),
        }
    }
}

impl PoolConfig {
    /// | Variable | Default |
    /// |----------|---------|
    /// | `DB_MAX_CONNECTIONS` | `10` |
    /// | `DB_ACQUIRE_TIMEOUT_SECS` | `30` |
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let base = Self::default();
        Self {
            max_connections: lookup("DB_MAX_CONNECTIONS")
                .and_then(|v| v.parse::<u32>().ok())
                .filter(|n| *n > 0)
                .unwrap_or(base.max_connections),
            acquire_timeout: lookup("DB_ACQUIRE_TIMEOUT_SECS")
                .and_then(|v| v.parse::<u64>().ok())
                .filter(|s| *s > 0)
                .map(Duration::from_secs)
                .unwrap_or(base.acquire_timeout),
        }
    }
}

/// Open a pool; the first connection is made eagerly so a bad URL fails here.
pub async fn create_pool_with_config(database_url: &str, config: PoolConfig) -> Result<PgPool> {
    let start = Instant::now();

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(1)
        .acquire_timeout(config.acquire_timeout)
        .idle_timeout(IDLE_TIMEOUT)
        .connect(database_url)
        .await
        .map_err(Error::Database)?;

    info!(
        subsystem = "database",
        component = "pool",
        op = "connect",
        max_connections = config.max_connections,
        duration_ms = start.elapsed().as_millis() as u64,
        "Catalog database connected"
    );
    Ok(pool)
}

/// Log pool occupancy; WARN when every connection is checked out.
pub fn log_pool_metrics(pool: &PgPool) {
    let (size, idle) = (pool.size(), pool.num_idle() as u32);
    if size > 0 && idle == 0 {
        warn!(
            subsystem = "database",
            component = "pool",
            op = "metrics",
            pool_size = size,
            "All catalog connections in use"
        );
    } else {
        debug!(
            subsystem = "database",
            component = "pool",
            op = "metrics",
            pool_size = size,
            pool_idle = idle,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_pool_config_from_env_defaults() {
        assert_eq!(PoolConfig::from_lookup(lookup(&[])), PoolConfig::default());
    }

    #[test]
    fn test_pool_config_from_env_overrides() {
        let config = PoolConfig::from_lookup(lookup(&[
            ("DB_MAX_CONNECTIONS", "25"),
            ("DB_ACQUIRE_TIMEOUT_SECS", "5"),
        ]));
        assert_eq!(config.max_connections, 25);
        assert_eq!(config.acquire_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_pool_config_ignores_zero_and_garbage() {
        let config = PoolConfig::from_lookup(lookup(&[
            ("DB_MAX_CONNECTIONS", "0"),
            ("DB_ACQUIRE_TIMEOUT_SECS", "soon"),
        ]));
        assert_eq!(config, PoolConfig::default());
    }
}
