//! # publikasi-db
//!
//! PostgreSQL database layer for the publikasi catalog.
//!
//! This crate provides:
//! - Connection pool management
//! - Repository implementations for categories, publications, notifications,
//!   search history and the user directory
//! - Filesystem blob storage for publication files and covers
//!
//! ## Example
//!
//! ```rust,ignore
//! use publikasi_db::{Database, CategoryRepository, NewCategory};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/publikasi").await?;
//!
//!     let roots = db.categories.list_children(None).await?;
//!     println!("{} root categories", roots.len());
//!     Ok(())
//! }
//! ```
pub mod categories;
pub mod file_storage;
pub mod notifications;
pub mod pool;
pub mod publication_filter;
pub mod publications;
pub mod search_history;
pub mod users;

// Test fixtures for integration tests
// Note: Always compiled so integration tests (in tests/) can use DEFAULT_TEST_DATABASE_URL
pub mod test_fixtures;

// Re-export core types
pub use publikasi_core::*;

/// Escape LIKE/ILIKE wildcard characters (`%`, `_`, `\`) in user input.
pub fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// True when `err` is a PostgreSQL unique-constraint violation (SQLSTATE 23505).
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .and_then(|db| db.code())
        .map(|code| code == "23505")
        .unwrap_or(false)
}

// Re-export repository implementations
pub use categories::PgCategoryRepository;
pub use file_storage::{generate_storage_path, FilesystemBackend};
pub use notifications::PgNotificationRepository;
pub use pool::{create_pool_with_config, log_pool_metrics, PoolConfig};
pub use publication_filter::{PublicationFilterQueryBuilder, QueryParam};
pub use publications::PgPublicationRepository;
pub use search_history::PgSearchHistoryRepository;
pub use users::PgUserDirectory;

/// Combined database context with all repositories.
#[derive(Clone)]
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    /// Two-level category hierarchy.
    pub categories: PgCategoryRepository,
    /// Publication catalog.
    pub publications: PgPublicationRepository,
    /// Per-user notifications.
    pub notifications: PgNotificationRepository,
    /// Per-user search keywords.
    pub search_history: PgSearchHistoryRepository,
    /// Read-only view of user accounts.
    pub users: PgUserDirectory,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            categories: PgCategoryRepository::new(pool.clone()),
            publications: PgPublicationRepository::new(pool.clone()),
            notifications: PgNotificationRepository::new(pool.clone()),
            search_history: PgSearchHistoryRepository::new(pool.clone()),
            users: PgUserDirectory::new(pool.clone()),
            pool,
        }
    }

    /// Connect using pool settings from the environment.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = create_pool_with_config(url, PoolConfig::from_env()).await?;
        Ok(Self::new(pool))
    }

    /// Create with custom pool configuration.
    pub async fn connect_with_config(url: &str, config: PoolConfig) -> Result<Self> {
        let pool = create_pool_with_config(url, config).await?;
        Ok(Self::new(pool))
    }

    /// Run pending migrations.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(sqlx::Error::Migrate(Box::new(e))))?;
        Ok(())
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &sqlx::Pool<sqlx::Postgres> {
        &self.pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like_wildcards() {
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("gdp_2020"), "gdp\\_2020");
        assert_eq!(escape_like("a\\b"), "a\\\\b");
        assert_eq!(escape_like("census"), "census");
    }
}
