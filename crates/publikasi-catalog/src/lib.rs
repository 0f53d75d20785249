//! # publikasi-catalog
//!
//! Catalog services for the publikasi statistical publication catalog.
//!
//! This crate provides:
//! - [`CategoryService`]: two-level category hierarchy
//! - [`PublicationService`]: upload, search, counters, download milestones
//! - [`NotificationService`]: per-recipient notification fan-out and inbox
//! - [`SearchHistoryTracker`]: deduplicated per-user search keywords
//! - [`Catalog`]: the services wired to one set of backends
//! - `memory`: an in-memory backend for tests (`mock` feature)
//!
//! ## Example
//!
//! ```rust,ignore
//! use publikasi_catalog::{Catalog, CatalogBackends};
//! use publikasi_core::{CategoryInput, PublicationQuery};
//!
//! let catalog = Catalog::new(backends);
//! let economy = catalog.categories.create(CategoryInput::new("Economy")).await?;
//! let hits = catalog
//!     .publications
//!     .search_as(Some(&actor), &PublicationQuery::default().keyword("census"))
//!     .await?;
//! ```

pub mod categories;
// In-memory backend for testing
#[cfg(any(test, feature = "mock"))]
pub mod memory;
pub mod notifications;
pub mod publications;
pub mod search_history;

use std::sync::Arc;

use tracing::warn;
use uuid::Uuid;

use publikasi_core::{
    BlobStore, CategoryRepository, CoverRenderer, Error, NotificationRepository,
    PublicationRepository, Result, Role, SearchHistoryRepository, SecurityEventKind, UserAccount,
    UserDirectory,
};

pub use categories::CategoryService;
pub use notifications::NotificationService;
pub use publications::PublicationService;
pub use search_history::SearchHistoryTracker;

/// Storage and collaborator implementations the catalog runs against.
#[derive(Clone)]
pub struct CatalogBackends {
    pub categories: Arc<dyn CategoryRepository>,
    pub publications: Arc<dyn PublicationRepository>,
    pub notifications: Arc<dyn NotificationRepository>,
    pub search_history: Arc<dyn SearchHistoryRepository>,
    pub users: Arc<dyn UserDirectory>,
    pub blobs: Arc<dyn BlobStore>,
    /// Cover generation is skipped when absent.
    pub covers: Option<Arc<dyn CoverRenderer>>,
}

impl CatalogBackends {
    pub fn with_covers(mut self, covers: Arc<dyn CoverRenderer>) -> Self {
        self.covers = Some(covers);
        self
    }
}

/// All catalog services sharing one set of backends.
#[derive(Clone)]
pub struct Catalog {
    pub categories: CategoryService,
    pub publications: PublicationService,
    pub notifications: NotificationService,
    pub search_history: SearchHistoryTracker,
    users: Arc<dyn UserDirectory>,
}

impl Catalog {
    pub fn new(backends: CatalogBackends) -> Self {
        let notifications = NotificationService::new(backends.notifications);
        let search_history = SearchHistoryTracker::new(backends.search_history);

        Self {
            categories: CategoryService::new(
                backends.categories.clone(),
                backends.publications.clone(),
            ),
            publications: PublicationService::new(
                backends.publications,
                backends.categories,
                backends.users.clone(),
                backends.blobs,
                backends.covers,
                notifications.clone(),
                search_history.clone(),
            ),
            notifications,
            search_history,
            users: backends.users,
        }
    }

    async fn require_user(&self, user_id: Uuid) -> Result<UserAccount> {
        self.users
            .get(user_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("User {} not found", user_id)))
    }

    /// Tell every admin about a new registration.
    pub async fn on_user_registered(&self, user_id: Uuid) -> Result<usize> {
        let user = self.require_user(user_id).await?;
        let admins = self.users.list_by_role(Role::Admin).await?;
        self.notifications
            .notify_admins_new_user(&user, &admins)
            .await
    }

    pub async fn on_profile_updated(&self, user_id: Uuid) -> Result<usize> {
        self.security_event(user_id, SecurityEventKind::ProfileUpdated)
            .await
    }

    pub async fn on_password_changed(&self, user_id: Uuid) -> Result<usize> {
        self.security_event(user_id, SecurityEventKind::PasswordChanged)
            .await
    }

    async fn security_event(&self, user_id: Uuid, kind: SecurityEventKind) -> Result<usize> {
        let user = self.require_user(user_id).await?;
        self.notifications
            .notify_security_event(user.id, kind)
            .await
            .inspect_err(|e| {
                warn!(
                    subsystem = "catalog",
                    component = "accounts",
                    op = "security_event",
                    user_id = %user.id,
                    error = %e,
                    "Security notification failed"
                );
            })
    }
}
