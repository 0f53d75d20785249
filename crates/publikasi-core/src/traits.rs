//! Core traits for publikasi abstractions.
//!
//! Repository traits are implemented by `publikasi-db` (PostgreSQL) and by the
//! in-memory backend in `publikasi-catalog`. Collaborator traits describe the
//! external services the catalog consumes but never implements itself.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::Result;
use crate::models::*;

// =============================================================================
// CATEGORY REPOSITORY
// =============================================================================

/// Storage for the category arena. Returned categories carry their
/// computed `publication_count`.
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Insert a validated category.
    async fn insert(&self, category: NewCategory) -> Result<Category>;

    /// Fetch a category by ID.
    async fn get(&self, id: Uuid) -> Result<Option<Category>>;

    /// Fetch a category by exact (case-sensitive) name.
    async fn get_by_name(&self, name: &str) -> Result<Option<Category>>;

    /// Every category, ordered by level, display order, name.
    async fn list_all(&self) -> Result<Vec<Category>>;

    /// Children of `parent_id` (or roots when None), ordered by display order, name.
    async fn list_children(&self, parent_id: Option<Uuid>) -> Result<Vec<Category>>;

    /// Overwrite the mutable fields of an existing category.
    async fn update(&self, category: &Category) -> Result<()>;

    /// Remove a category row.
    async fn delete(&self, id: Uuid) -> Result<()>;

    /// Number of categories whose parent is `id`.
    async fn count_children(&self, id: Uuid) -> Result<i64>;
}

// =============================================================================
// PUBLICATION REPOSITORY
// =============================================================================

/// Storage for publications.
#[async_trait]
pub trait PublicationRepository: Send + Sync {
    /// Insert a new publication with zeroed counters.
    async fn insert(&self, publication: NewPublication) -> Result<Publication>;

    /// Fetch a publication by ID.
    async fn get(&self, id: Uuid) -> Result<Option<Publication>>;

    /// Overwrite metadata fields, including the flagship flag, and bump
    /// `updated_at` in one write.
    async fn update_metadata(&self, id: Uuid, metadata: &PublicationMetadata) -> Result<Publication>;

    /// Set or clear the flagship flag.
    async fn set_flagship(&self, id: Uuid, is_flagship: bool) -> Result<()>;

    /// Remove a publication row.
    async fn delete(&self, id: Uuid) -> Result<()>;

    /// Conjunctive filtered search, optionally sorted by creation time.
    async fn search(
        &self,
        filter: &PublicationFilter,
        sort: Option<PublicationSort>,
    ) -> Result<Vec<Publication>>;

    /// Newest publications first.
    async fn latest(&self, limit: i64) -> Result<Vec<Publication>>;

    /// Most downloaded first.
    async fn most_downloaded(&self, limit: i64) -> Result<Vec<Publication>>;

    /// Most viewed first.
    async fn most_viewed(&self, limit: i64) -> Result<Vec<Publication>>;

    /// Flagship publications, most recently updated first.
    async fn flagship(&self) -> Result<Vec<Publication>>;

    /// Number of flagship publications.
    async fn count_flagship(&self) -> Result<i64>;

    /// Publications uploaded by `user_id`, newest first.
    async fn list_by_uploader(&self, user_id: Uuid) -> Result<Vec<Publication>>;

    /// Distinct titles containing `keyword` (case-insensitive), ascending.
    async fn suggest_titles(&self, keyword: &str, limit: i64) -> Result<Vec<String>>;

    /// Number of publications filed under a category.
    async fn count_by_category(&self, category_id: Uuid) -> Result<i64>;

    /// Atomically add one view; returns the new count, None if absent.
    async fn increment_views(&self, id: Uuid) -> Result<Option<i64>>;

    /// Atomically add one download; returns the new count, None if absent.
    async fn increment_downloads(&self, id: Uuid) -> Result<Option<i64>>;
}

// =============================================================================
// NOTIFICATION REPOSITORY
// =============================================================================

/// Storage for notifications.
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Insert all notifications or none. Returns the number inserted.
    async fn insert_batch(&self, batch: Vec<NewNotification>) -> Result<usize>;

    /// Fetch a notification by ID.
    async fn get(&self, id: Uuid) -> Result<Option<Notification>>;

    /// A page of a user's notifications, newest first, with the total count.
    async fn list_for_user(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Notification>, i64)>;

    /// Unread notifications for a user, newest first.
    async fn list_unread(&self, user_id: Uuid) -> Result<Vec<Notification>>;

    /// Number of unread notifications for a user.
    async fn count_unread(&self, user_id: Uuid) -> Result<i64>;

    /// Flag a single notification as read.
    async fn mark_read(&self, id: Uuid) -> Result<()>;

    /// Flag all of a user's unread notifications as read.
    async fn mark_all_read(&self, user_id: Uuid) -> Result<u64>;

    /// Remove a single notification.
    async fn delete(&self, id: Uuid) -> Result<()>;

    /// Remove a user's read notifications.
    async fn delete_read(&self, user_id: Uuid) -> Result<u64>;

    /// Remove every notification created before `cutoff`.
    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64>;
}

// =============================================================================
// SEARCH HISTORY REPOSITORY
// =============================================================================

/// Storage for per-user search keywords.
#[async_trait]
pub trait SearchHistoryRepository: Send + Sync {
    /// Entry for an exact (user, keyword) pair.
    async fn find(&self, user_id: Uuid, keyword: &str) -> Result<Option<SearchHistoryEntry>>;

    /// Insert a new entry.
    async fn insert(
        &self,
        user_id: Uuid,
        keyword: &str,
        searched_at: DateTime<Utc>,
    ) -> Result<SearchHistoryEntry>;

    /// Move an existing entry to `searched_at`.
    async fn touch(&self, id: Uuid, searched_at: DateTime<Utc>) -> Result<()>;

    /// Most recent entries first.
    async fn list_recent(&self, user_id: Uuid, limit: i64) -> Result<Vec<SearchHistoryEntry>>;

    /// Remove all of a user's entries.
    async fn delete_for_user(&self, user_id: Uuid) -> Result<u64>;
}

// =============================================================================
// EXTERNAL COLLABORATORS
// =============================================================================

/// Read access to user accounts, used for existence checks and audiences.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Fetch an account by ID.
    async fn get(&self, id: Uuid) -> Result<Option<UserAccount>>;

    /// Every account holding `role`.
    async fn list_by_role(&self, role: Role) -> Result<Vec<UserAccount>>;
}

/// Opaque byte storage keyed by generated references.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store bytes and return a new reference. `name_hint` only contributes
    /// its extension.
    async fn put(&self, data: &[u8], name_hint: &str) -> Result<String>;

    /// Bytes for a reference, None if nothing is stored there.
    async fn get(&self, blob_ref: &str) -> Result<Option<Vec<u8>>>;

    /// Remove bytes for a reference. Absent references are not an error.
    async fn delete(&self, blob_ref: &str) -> Result<()>;
}

/// Renders a cover image for a stored publication file.
#[async_trait]
pub trait CoverRenderer: Send + Sync {
    /// Render the first page of `file_ref`; returns the cover's blob reference.
    async fn render(&self, file_ref: &str) -> Result<String>;
}
