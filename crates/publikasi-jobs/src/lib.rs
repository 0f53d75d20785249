//! # publikasi-jobs
//!
//! Scheduled maintenance for the publikasi catalog.
//!
//! This crate provides:
//! - [`RetentionWorker`]: daily purge of notifications past the retention window
//! - [`AppConfig`] / [`RetentionConfig`]: environment configuration
//! - [`backends_from_database`]: PostgreSQL + filesystem wiring for [`Catalog`]
//!
//! ## Example
//!
//! ```ignore
//! use publikasi_jobs::{RetentionConfig, RetentionWorker};
//!
//! let worker = RetentionWorker::new(catalog.notifications.clone(), RetentionConfig::from_env());
//! let handle = worker.start();
//! // ...
//! handle.shutdown().await?;
//! ```
//!
//! [`Catalog`]: publikasi_catalog::Catalog

pub mod config;
pub mod retention;

use std::sync::Arc;

use publikasi_catalog::CatalogBackends;
use publikasi_db::{Database, FilesystemBackend};

pub use config::{AppConfig, RetentionConfig, DEFAULT_DATABASE_URL};
pub use retention::{RetentionEvent, RetentionWorker, WorkerHandle};

/// Catalog backends over PostgreSQL and a filesystem blob store. Cover
/// rendering is not configured.
pub fn backends_from_database(db: &Database, blobs: FilesystemBackend) -> CatalogBackends {
    CatalogBackends {
        categories: Arc::new(db.categories.clone()),
        publications: Arc::new(db.publications.clone()),
        notifications: Arc::new(db.notifications.clone()),
        search_history: Arc::new(db.search_history.clone()),
        users: Arc::new(db.users.clone()),
        blobs: Arc::new(blobs),
        covers: None,
    }
}
