//! In-memory backend for deterministic testing.
//!
//! [`MemoryStore`] implements every repository and collaborator trait over
//! mutex-guarded tables, mirroring the constraints the PostgreSQL schema
//! enforces (unique names, restrict-on-delete, all-or-nothing batches).
//!
//! ## Usage
//!
//! ```rust,ignore
//! use publikasi_catalog::memory::MemoryStore;
//! use publikasi_catalog::Catalog;
//!
//! let store = MemoryStore::new();
//! let admin = store.add_user("admin@bps.go.id", Role::Admin);
//! let catalog = Catalog::new(store.backends());
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use publikasi_core::file_safety::file_extension;
use publikasi_core::{
    BlobStore, Category, CategoryRepository, CoverRenderer, Error, NewCategory, NewNotification,
    NewPublication, Notification, NotificationRepository, Publication, PublicationFilter,
    PublicationMetadata, PublicationRepository, PublicationSort, Result, Role, SearchHistoryEntry,
    SearchHistoryRepository, UserAccount, UserDirectory,
};

use crate::CatalogBackends;

#[derive(Default)]
struct Tables {
    users: Vec<UserAccount>,
    categories: Vec<Category>,
    publications: Vec<Publication>,
    notifications: Vec<Notification>,
    history: Vec<SearchHistoryEntry>,
    blobs: HashMap<String, Vec<u8>>,
}

impl Tables {
    fn publication_count(&self, category_id: Uuid) -> i64 {
        self.publications
            .iter()
            .filter(|p| p.category_id == category_id)
            .count() as i64
    }

    fn with_count(&self, category: &Category) -> Category {
        let mut category = category.clone();
        category.publication_count = self.publication_count(category.id);
        category
    }
}

fn by_order_then_name(a: &Category, b: &Category) -> std::cmp::Ordering {
    a.display_order
        .cmp(&b.display_order)
        .then_with(|| a.name.cmp(&b.name))
}

/// Mock storage for every catalog backend.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
    fail_notification_writes: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|_| Error::Internal("memory store lock poisoned".into()))
    }

    /// Backends wired to this store, without a cover renderer.
    pub fn backends(&self) -> CatalogBackends {
        let shared = Arc::new(self.clone());
        CatalogBackends {
            categories: shared.clone(),
            publications: shared.clone(),
            notifications: shared.clone(),
            search_history: shared.clone(),
            users: shared.clone(),
            blobs: shared,
            covers: None,
        }
    }

    /// Register an account in the user directory.
    pub fn add_user(&self, email: &str, role: Role) -> UserAccount {
        let account = UserAccount {
            id: Uuid::now_v7(),
            email: email.to_string(),
            full_name: None,
            role,
            created_at_utc: Utc::now(),
        };
        if let Ok(mut tables) = self.lock() {
            tables.users.push(account.clone());
        }
        account
    }

    /// Make every subsequent notification batch fail.
    pub fn fail_notification_writes(&self, fail: bool) {
        self.fail_notification_writes.store(fail, Ordering::SeqCst);
    }

    fn get_blob(&self, blob_ref: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.lock()?.blobs.get(blob_ref).cloned())
    }

    /// Number of blobs currently stored.
    pub fn blob_count(&self) -> usize {
        self.lock().map(|t| t.blobs.len()).unwrap_or(0)
    }

    /// Remove bytes behind the store's back, simulating a lost file.
    pub fn lose_blob(&self, blob_ref: &str) {
        if let Ok(mut tables) = self.lock() {
            tables.blobs.remove(blob_ref);
        }
    }

    /// Rewrite a notification's creation time.
    pub fn set_notification_created_at(&self, id: Uuid, at: DateTime<Utc>) {
        if let Ok(mut tables) = self.lock() {
            if let Some(n) = tables.notifications.iter_mut().find(|n| n.id == id) {
                n.created_at_utc = at;
            }
        }
    }

    /// Every stored notification, in insertion order.
    pub fn all_notifications(&self) -> Vec<Notification> {
        self.lock()
            .map(|t| t.notifications.clone())
            .unwrap_or_default()
    }

    /// Overwrite a publication's download counter.
    pub fn set_downloads(&self, id: Uuid, downloads: i64) {
        if let Ok(mut tables) = self.lock() {
            if let Some(p) = tables.publications.iter_mut().find(|p| p.id == id) {
                p.downloads = downloads;
            }
        }
    }
}

// =============================================================================
// CATEGORIES
// =============================================================================

#[async_trait]
impl CategoryRepository for MemoryStore {
    async fn insert(&self, category: NewCategory) -> Result<Category> {
        let mut tables = self.lock()?;
        if tables.categories.iter().any(|c| c.name == category.name) {
            return Err(Error::DuplicateName(category.name));
        }
        if let Some(parent_id) = category.parent_id {
            match tables.categories.iter().find(|c| c.id == parent_id) {
                None => return Err(Error::ParentNotFound(parent_id)),
                Some(parent) if !parent.is_root() => return Err(Error::DepthExceeded(parent_id)),
                Some(_) => {}
            }
        }

        let created = Category {
            id: Uuid::now_v7(),
            name: category.name,
            description: category.description,
            parent_id: category.parent_id,
            level: category.level,
            display_order: category.display_order,
            created_at_utc: Utc::now(),
            publication_count: 0,
        };
        tables.categories.push(created.clone());
        Ok(created)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Category>> {
        let tables = self.lock()?;
        Ok(tables
            .categories
            .iter()
            .find(|c| c.id == id)
            .map(|c| tables.with_count(c)))
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<Category>> {
        let tables = self.lock()?;
        Ok(tables
            .categories
            .iter()
            .find(|c| c.name == name)
            .map(|c| tables.with_count(c)))
    }

    async fn list_all(&self) -> Result<Vec<Category>> {
        let tables = self.lock()?;
        let mut all: Vec<Category> = tables
            .categories
            .iter()
            .map(|c| tables.with_count(c))
            .collect();
        all.sort_by(|a, b| a.level.cmp(&b.level).then_with(|| by_order_then_name(a, b)));
        Ok(all)
    }

    async fn list_children(&self, parent_id: Option<Uuid>) -> Result<Vec<Category>> {
        let tables = self.lock()?;
        let mut children: Vec<Category> = tables
            .categories
            .iter()
            .filter(|c| c.parent_id == parent_id)
            .map(|c| tables.with_count(c))
            .collect();
        children.sort_by(by_order_then_name);
        Ok(children)
    }

    async fn update(&self, category: &Category) -> Result<()> {
        let mut tables = self.lock()?;
        if tables
            .categories
            .iter()
            .any(|c| c.name == category.name && c.id != category.id)
        {
            return Err(Error::DuplicateName(category.name.clone()));
        }
        let stored = tables
            .categories
            .iter_mut()
            .find(|c| c.id == category.id)
            .ok_or_else(|| Error::NotFound(format!("Category {} not found", category.id)))?;

        stored.name = category.name.clone();
        stored.description = category.description.clone();
        stored.parent_id = category.parent_id;
        stored.level = category.level;
        stored.display_order = category.display_order;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let mut tables = self.lock()?;
        if !tables.categories.iter().any(|c| c.id == id) {
            return Err(Error::NotFound(format!("Category {} not found", id)));
        }
        let count = tables.publication_count(id);
        if count > 0 {
            return Err(Error::HasPublications { id, count });
        }
        if tables.categories.iter().any(|c| c.parent_id == Some(id)) {
            return Err(Error::HasChildren(id));
        }
        tables.categories.retain(|c| c.id != id);
        Ok(())
    }

    async fn count_children(&self, id: Uuid) -> Result<i64> {
        let tables = self.lock()?;
        Ok(tables
            .categories
            .iter()
            .filter(|c| c.parent_id == Some(id))
            .count() as i64)
    }
}

// =============================================================================
// PUBLICATIONS
// =============================================================================

/// Newest first; insertion order breaks timestamp ties.
fn newest_first(publications: &[Publication]) -> Vec<Publication> {
    let mut indexed: Vec<(usize, &Publication)> = publications.iter().enumerate().collect();
    indexed.sort_by(|(ia, a), (ib, b)| {
        b.created_at_utc
            .cmp(&a.created_at_utc)
            .then_with(|| ib.cmp(ia))
    });
    indexed.into_iter().map(|(_, p)| p.clone()).collect()
}

#[async_trait]
impl PublicationRepository for MemoryStore {
    async fn insert(&self, publication: NewPublication) -> Result<Publication> {
        let mut tables = self.lock()?;
        let meta = publication.metadata;
        if !tables.categories.iter().any(|c| c.id == meta.category_id) {
            return Err(Error::CategoryNotFound(meta.category_id));
        }

        let now = Utc::now();
        let created = Publication {
            id: Uuid::now_v7(),
            title: meta.title,
            description: meta.description,
            catalog_number: meta.catalog_number,
            publication_number: meta.publication_number,
            issn_isbn: meta.issn_isbn,
            release_frequency: meta.release_frequency,
            release_date: meta.release_date,
            language: meta.language,
            year: meta.year,
            author: meta.author,
            cover_image_ref: publication.cover_image_ref,
            file_ref: publication.file_ref,
            file_name: publication.file_name,
            file_size: publication.file_size,
            views: 0,
            downloads: 0,
            category_id: meta.category_id,
            uploaded_by: publication.uploaded_by,
            is_flagship: meta.is_flagship,
            created_at_utc: now,
            updated_at_utc: now,
        };
        tables.publications.push(created.clone());
        Ok(created)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Publication>> {
        let tables = self.lock()?;
        Ok(tables.publications.iter().find(|p| p.id == id).cloned())
    }

    async fn update_metadata(
        &self,
        id: Uuid,
        metadata: &PublicationMetadata,
    ) -> Result<Publication> {
        let mut tables = self.lock()?;
        let stored = tables
            .publications
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| Error::NotFound(format!("Publication {} not found", id)))?;

        stored.title = metadata.title.clone();
        stored.description = metadata.description.clone();
        stored.catalog_number = metadata.catalog_number.clone();
        stored.publication_number = metadata.publication_number.clone();
        stored.issn_isbn = metadata.issn_isbn.clone();
        stored.release_frequency = metadata.release_frequency.clone();
        stored.release_date = metadata.release_date;
        stored.language = metadata.language.clone();
        stored.year = metadata.year;
        stored.author = metadata.author.clone();
        stored.category_id = metadata.category_id;
        stored.is_flagship = metadata.is_flagship;
        stored.updated_at_utc = Utc::now();
        Ok(stored.clone())
    }

    async fn set_flagship(&self, id: Uuid, is_flagship: bool) -> Result<()> {
        let mut tables = self.lock()?;
        let stored = tables
            .publications
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| Error::NotFound(format!("Publication {} not found", id)))?;
        stored.is_flagship = is_flagship;
        stored.updated_at_utc = Utc::now();
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let mut tables = self.lock()?;
        let before = tables.publications.len();
        tables.publications.retain(|p| p.id != id);
        if tables.publications.len() == before {
            return Err(Error::NotFound(format!("Publication {} not found", id)));
        }
        Ok(())
    }

    async fn search(
        &self,
        filter: &PublicationFilter,
        sort: Option<PublicationSort>,
    ) -> Result<Vec<Publication>> {
        let tables = self.lock()?;
        let matched: Vec<Publication> = tables
            .publications
            .iter()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();

        Ok(match sort {
            Some(PublicationSort::Latest) => newest_first(&matched),
            Some(PublicationSort::Oldest) => {
                let mut oldest = newest_first(&matched);
                oldest.reverse();
                oldest
            }
            None => matched,
        })
    }

    async fn latest(&self, limit: i64) -> Result<Vec<Publication>> {
        let tables = self.lock()?;
        let mut latest = newest_first(&tables.publications);
        latest.truncate(limit.max(0) as usize);
        Ok(latest)
    }

    async fn most_downloaded(&self, limit: i64) -> Result<Vec<Publication>> {
        let tables = self.lock()?;
        let mut ranked = tables.publications.clone();
        ranked.sort_by(|a, b| b.downloads.cmp(&a.downloads));
        ranked.truncate(limit.max(0) as usize);
        Ok(ranked)
    }

    async fn most_viewed(&self, limit: i64) -> Result<Vec<Publication>> {
        let tables = self.lock()?;
        let mut ranked = tables.publications.clone();
        ranked.sort_by(|a, b| b.views.cmp(&a.views));
        ranked.truncate(limit.max(0) as usize);
        Ok(ranked)
    }

    async fn flagship(&self) -> Result<Vec<Publication>> {
        let tables = self.lock()?;
        let mut flagged: Vec<(usize, Publication)> = tables
            .publications
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_flagship)
            .map(|(i, p)| (i, p.clone()))
            .collect();
        flagged.sort_by(|(ia, a), (ib, b)| {
            b.updated_at_utc
                .cmp(&a.updated_at_utc)
                .then_with(|| ib.cmp(ia))
        });
        Ok(flagged.into_iter().map(|(_, p)| p).collect())
    }

    async fn count_flagship(&self) -> Result<i64> {
        let tables = self.lock()?;
        Ok(tables.publications.iter().filter(|p| p.is_flagship).count() as i64)
    }

    async fn list_by_uploader(&self, user_id: Uuid) -> Result<Vec<Publication>> {
        let tables = self.lock()?;
        let own: Vec<Publication> = tables
            .publications
            .iter()
            .filter(|p| p.uploaded_by == user_id)
            .cloned()
            .collect();
        Ok(newest_first(&own))
    }

    async fn suggest_titles(&self, keyword: &str, limit: i64) -> Result<Vec<String>> {
        let tables = self.lock()?;
        let needle = keyword.to_lowercase();
        let mut titles: Vec<String> = tables
            .publications
            .iter()
            .filter(|p| p.title.to_lowercase().contains(&needle))
            .map(|p| p.title.clone())
            .collect();
        titles.sort_by(|a, b| {
            a.to_lowercase()
                .cmp(&b.to_lowercase())
                .then_with(|| a.cmp(b))
        });
        titles.dedup();
        titles.truncate(limit.max(0) as usize);
        Ok(titles)
    }

    async fn count_by_category(&self, category_id: Uuid) -> Result<i64> {
        Ok(self.lock()?.publication_count(category_id))
    }

    async fn increment_views(&self, id: Uuid) -> Result<Option<i64>> {
        let mut tables = self.lock()?;
        Ok(tables
            .publications
            .iter_mut()
            .find(|p| p.id == id)
            .map(|p| {
                p.views += 1;
                p.views
            }))
    }

    async fn increment_downloads(&self, id: Uuid) -> Result<Option<i64>> {
        let mut tables = self.lock()?;
        Ok(tables
            .publications
            .iter_mut()
            .find(|p| p.id == id)
            .map(|p| {
                p.downloads += 1;
                p.downloads
            }))
    }
}

// =============================================================================
// NOTIFICATIONS
// =============================================================================

fn newest_notifications<'a>(
    items: impl Iterator<Item = (usize, &'a Notification)>,
) -> Vec<Notification> {
    let mut indexed: Vec<(usize, &Notification)> = items.collect();
    indexed.sort_by(|(ia, a), (ib, b)| {
        b.created_at_utc
            .cmp(&a.created_at_utc)
            .then_with(|| ib.cmp(ia))
    });
    indexed.into_iter().map(|(_, n)| n.clone()).collect()
}

#[async_trait]
impl NotificationRepository for MemoryStore {
    async fn insert_batch(&self, batch: Vec<NewNotification>) -> Result<usize> {
        if self.fail_notification_writes.load(Ordering::SeqCst) {
            return Err(Error::Internal("notification store unavailable".into()));
        }

        let mut tables = self.lock()?;
        if let Some(missing) = batch
            .iter()
            .find(|n| !tables.users.iter().any(|u| u.id == n.recipient_id))
        {
            return Err(Error::Internal(format!(
                "unknown notification recipient {}",
                missing.recipient_id
            )));
        }

        let now = Utc::now();
        let count = batch.len();
        tables
            .notifications
            .extend(batch.into_iter().map(|n| Notification {
                id: Uuid::now_v7(),
                recipient_id: n.recipient_id,
                title: n.title,
                message: n.message,
                notification_type: n.notification_type,
                related_entity_type: n.related_entity_type,
                related_entity_id: n.related_entity_id,
                is_read: false,
                created_at_utc: now,
            }));
        Ok(count)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Notification>> {
        let tables = self.lock()?;
        Ok(tables.notifications.iter().find(|n| n.id == id).cloned())
    }

    async fn list_for_user(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Notification>, i64)> {
        let tables = self.lock()?;
        let own = newest_notifications(
            tables
                .notifications
                .iter()
                .enumerate()
                .filter(|(_, n)| n.recipient_id == user_id),
        );
        let total = own.len() as i64;
        let page = own
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect();
        Ok((page, total))
    }

    async fn list_unread(&self, user_id: Uuid) -> Result<Vec<Notification>> {
        let tables = self.lock()?;
        Ok(newest_notifications(
            tables
                .notifications
                .iter()
                .enumerate()
                .filter(|(_, n)| n.recipient_id == user_id && !n.is_read),
        ))
    }

    async fn count_unread(&self, user_id: Uuid) -> Result<i64> {
        let tables = self.lock()?;
        Ok(tables
            .notifications
            .iter()
            .filter(|n| n.recipient_id == user_id && !n.is_read)
            .count() as i64)
    }

    async fn mark_read(&self, id: Uuid) -> Result<()> {
        let mut tables = self.lock()?;
        let stored = tables
            .notifications
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| Error::NotFound(format!("Notification {} not found", id)))?;
        stored.is_read = true;
        Ok(())
    }

    async fn mark_all_read(&self, user_id: Uuid) -> Result<u64> {
        let mut tables = self.lock()?;
        let mut updated = 0;
        for n in tables
            .notifications
            .iter_mut()
            .filter(|n| n.recipient_id == user_id && !n.is_read)
        {
            n.is_read = true;
            updated += 1;
        }
        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let mut tables = self.lock()?;
        let before = tables.notifications.len();
        tables.notifications.retain(|n| n.id != id);
        if tables.notifications.len() == before {
            return Err(Error::NotFound(format!("Notification {} not found", id)));
        }
        Ok(())
    }

    async fn delete_read(&self, user_id: Uuid) -> Result<u64> {
        let mut tables = self.lock()?;
        let before = tables.notifications.len();
        tables
            .notifications
            .retain(|n| !(n.recipient_id == user_id && n.is_read));
        Ok((before - tables.notifications.len()) as u64)
    }

    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64> {
        let mut tables = self.lock()?;
        let before = tables.notifications.len();
        tables.notifications.retain(|n| n.created_at_utc >= cutoff);
        Ok((before - tables.notifications.len()) as u64)
    }
}

// =============================================================================
// SEARCH HISTORY
// =============================================================================

#[async_trait]
impl SearchHistoryRepository for MemoryStore {
    async fn find(&self, user_id: Uuid, keyword: &str) -> Result<Option<SearchHistoryEntry>> {
        let tables = self.lock()?;
        Ok(tables
            .history
            .iter()
            .find(|e| e.user_id == user_id && e.keyword == keyword)
            .cloned())
    }

    async fn insert(
        &self,
        user_id: Uuid,
        keyword: &str,
        searched_at: DateTime<Utc>,
    ) -> Result<SearchHistoryEntry> {
        let mut tables = self.lock()?;
        if let Some(existing) = tables
            .history
            .iter_mut()
            .find(|e| e.user_id == user_id && e.keyword == keyword)
        {
            existing.searched_at_utc = searched_at;
            return Ok(existing.clone());
        }

        let entry = SearchHistoryEntry {
            id: Uuid::now_v7(),
            user_id,
            keyword: keyword.to_string(),
            searched_at_utc: searched_at,
        };
        tables.history.push(entry.clone());
        Ok(entry)
    }

    async fn touch(&self, id: Uuid, searched_at: DateTime<Utc>) -> Result<()> {
        let mut tables = self.lock()?;
        let entry = tables
            .history
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| Error::NotFound(format!("Search history entry {} not found", id)))?;
        entry.searched_at_utc = searched_at;
        Ok(())
    }

    async fn list_recent(&self, user_id: Uuid, limit: i64) -> Result<Vec<SearchHistoryEntry>> {
        let tables = self.lock()?;
        let mut own: Vec<SearchHistoryEntry> = tables
            .history
            .iter()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect();
        own.sort_by(|a, b| b.searched_at_utc.cmp(&a.searched_at_utc));
        own.truncate(limit.max(0) as usize);
        Ok(own)
    }

    async fn delete_for_user(&self, user_id: Uuid) -> Result<u64> {
        let mut tables = self.lock()?;
        let before = tables.history.len();
        tables.history.retain(|e| e.user_id != user_id);
        Ok((before - tables.history.len()) as u64)
    }
}

// =============================================================================
// COLLABORATORS
// =============================================================================

#[async_trait]
impl UserDirectory for MemoryStore {
    async fn get(&self, id: Uuid) -> Result<Option<UserAccount>> {
        let tables = self.lock()?;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn list_by_role(&self, role: Role) -> Result<Vec<UserAccount>> {
        let tables = self.lock()?;
        Ok(tables
            .users
            .iter()
            .filter(|u| u.role == role)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl BlobStore for MemoryStore {
    async fn put(&self, data: &[u8], name_hint: &str) -> Result<String> {
        let blob_ref = format!("mem/{}{}", Uuid::now_v7(), file_extension(name_hint));
        self.lock()?.blobs.insert(blob_ref.clone(), data.to_vec());
        Ok(blob_ref)
    }

    async fn get(&self, blob_ref: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.lock()?.blobs.get(blob_ref).cloned())
    }

    async fn delete(&self, blob_ref: &str) -> Result<()> {
        self.lock()?.blobs.remove(blob_ref);
        Ok(())
    }
}

/// Cover renderer that stores a fixed JPEG stub for every file.
#[derive(Clone)]
pub struct StubCoverRenderer {
    store: MemoryStore,
}

impl StubCoverRenderer {
    /// JPEG start-of-image marker followed by filler.
    pub const COVER_BYTES: &'static [u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10];

    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CoverRenderer for StubCoverRenderer {
    async fn render(&self, file_ref: &str) -> Result<String> {
        if self.store.get_blob(file_ref)?.is_none() {
            return Err(Error::FileMissing(file_ref.to_string()));
        }
        BlobStore::put(&self.store, Self::COVER_BYTES, "cover.jpg").await
    }
}

/// Cover renderer that always fails.
#[derive(Clone, Default)]
pub struct FailingCoverRenderer;

#[async_trait]
impl CoverRenderer for FailingCoverRenderer {
    async fn render(&self, file_ref: &str) -> Result<String> {
        Err(Error::Internal(format!("cannot render cover for {}", file_ref)))
    }
}
