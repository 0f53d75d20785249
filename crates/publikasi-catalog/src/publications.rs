//! Publication catalog: upload, search, counters and the download milestone
//! fan-out.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};
use uuid::Uuid;

use publikasi_core::defaults::{SUGGESTION_LIMIT, TOP_LIST_LIMIT};
use publikasi_core::{
    milestone, sanitize_filename, validate_publication_upload, Actor, BlobStore,
    CategoryRepository, CoverRenderer, Error, FileContent, NewPublication, Publication,
    PublicationMetadata, PublicationQuery, PublicationRepository, Result, Role, UploadedFile,
    UserDirectory, COVER_MIME, PDF_MIME,
};

use crate::notifications::NotificationService;
use crate::search_history::SearchHistoryTracker;

/// Catalog operations over publications.
#[derive(Clone)]
pub struct PublicationService {
    publications: Arc<dyn PublicationRepository>,
    categories: Arc<dyn CategoryRepository>,
    users: Arc<dyn UserDirectory>,
    blobs: Arc<dyn BlobStore>,
    covers: Option<Arc<dyn CoverRenderer>>,
    notifications: NotificationService,
    history: SearchHistoryTracker,
}

impl PublicationService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        publications: Arc<dyn PublicationRepository>,
        categories: Arc<dyn CategoryRepository>,
        users: Arc<dyn UserDirectory>,
        blobs: Arc<dyn BlobStore>,
        covers: Option<Arc<dyn CoverRenderer>>,
        notifications: NotificationService,
        history: SearchHistoryTracker,
    ) -> Self {
        Self {
            publications,
            categories,
            users,
            blobs,
            covers,
            notifications,
            history,
        }
    }

    async fn require(&self, id: Uuid) -> Result<Publication> {
        self.publications
            .get(id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Publication {} not found", id)))
    }

    async fn require_category(&self, category_id: Uuid) -> Result<()> {
        if self.categories.get(category_id).await?.is_none() {
            return Err(Error::CategoryNotFound(category_id));
        }
        Ok(())
    }

    fn check_owner(publication: &Publication, actor: &Actor) -> Result<()> {
        if !actor.can_modify(publication.uploaded_by) {
            return Err(Error::Forbidden(format!(
                "User {} may not modify publication {}",
                actor.user_id, publication.id
            )));
        }
        Ok(())
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// Conjunctive keyword/category/year filter, then the optional sort.
    pub async fn search(&self, query: &PublicationQuery) -> Result<Vec<Publication>> {
        let start = Instant::now();
        let results = self
            .publications
            .search(&query.filter, query.parsed_sort())
            .await?;

        debug!(
            subsystem = "catalog",
            component = "publications",
            op = "search",
            has_keyword = query.filter.effective_keyword().is_some(),
            category_id = ?query.filter.category_id,
            year = ?query.filter.year,
            result_count = results.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Search complete"
        );
        Ok(results)
    }

    /// Record the keyword in the actor's history, then search.
    pub async fn search_as(
        &self,
        actor: Option<&Actor>,
        query: &PublicationQuery,
    ) -> Result<Vec<Publication>> {
        if let (Some(actor), Some(keyword)) = (actor, query.filter.keyword.as_deref()) {
            self.history.record_search(actor.user_id, keyword).await?;
        }
        self.search(query).await
    }

    /// Fetch a publication and count the view.
    pub async fn get_by_id(&self, id: Uuid) -> Result<Publication> {
        let mut publication = self.require(id).await?;
        let views = self
            .publications
            .increment_views(id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Publication {} not found", id)))?;
        publication.views = views;
        Ok(publication)
    }

    pub async fn get_latest(&self) -> Result<Vec<Publication>> {
        self.publications.latest(TOP_LIST_LIMIT).await
    }

    pub async fn get_most_downloaded(&self) -> Result<Vec<Publication>> {
        self.publications.most_downloaded(TOP_LIST_LIMIT).await
    }

    pub async fn get_most_viewed(&self) -> Result<Vec<Publication>> {
        self.publications.most_viewed(TOP_LIST_LIMIT).await
    }

    pub async fn get_flagship(&self) -> Result<Vec<Publication>> {
        self.publications.flagship().await
    }

    pub async fn count_flagship(&self) -> Result<i64> {
        self.publications.count_flagship().await
    }

    pub async fn list_by_uploader(&self, user_id: Uuid) -> Result<Vec<Publication>> {
        self.publications.list_by_uploader(user_id).await
    }

    /// Up to ten distinct matching titles, alphabetical.
    pub async fn suggest_titles(&self, keyword: &str) -> Result<Vec<String>> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Ok(Vec::new());
        }
        self.publications
            .suggest_titles(keyword, SUGGESTION_LIMIT)
            .await
    }

    // =========================================================================
    // MUTATIONS
    // =========================================================================

    /// Validate, store the file, render a cover if possible, persist, then
    /// announce the publication to every regular user.
    pub async fn upload(
        &self,
        metadata: PublicationMetadata,
        file: UploadedFile,
        uploader: &Actor,
    ) -> Result<Publication> {
        let start = Instant::now();

        validate_publication_upload(&file)?;
        metadata.validate()?;
        self.require_category(metadata.category_id).await?;
        if self.users.get(uploader.user_id).await?.is_none() {
            return Err(Error::UploaderNotFound(uploader.user_id));
        }

        let file_name = sanitize_filename(&file.file_name);
        let file_size = file.bytes.len() as i64;
        let file_ref = self.blobs.put(&file.bytes, &file_name).await?;

        let cover_image_ref = match &self.covers {
            Some(renderer) => match renderer.render(&file_ref).await {
                Ok(cover_ref) => Some(cover_ref),
                Err(e) => {
                    warn!(
                        subsystem = "catalog",
                        component = "publications",
                        op = "render_cover",
                        file_ref = %file_ref,
                        error = %e,
                        "Cover rendering failed, continuing without cover"
                    );
                    None
                }
            },
            None => None,
        };

        let mut metadata = metadata;
        metadata.title = metadata.title.trim().to_string();
        metadata.is_flagship = metadata.is_flagship && uploader.is_admin();

        let inserted = self
            .publications
            .insert(NewPublication {
                metadata,
                file_ref: file_ref.clone(),
                file_name,
                file_size,
                cover_image_ref: cover_image_ref.clone(),
                uploaded_by: uploader.user_id,
            })
            .await;

        let publication = match inserted {
            Ok(publication) => publication,
            Err(e) => {
                self.discard_blob(&file_ref).await;
                if let Some(cover_ref) = &cover_image_ref {
                    self.discard_blob(cover_ref).await;
                }
                return Err(e);
            }
        };

        info!(
            subsystem = "catalog",
            component = "publications",
            op = "upload",
            publication_id = %publication.id,
            user_id = %uploader.user_id,
            file_size,
            has_cover = publication.cover_image_ref.is_some(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Publication uploaded"
        );

        self.announce(&publication).await;
        Ok(publication)
    }

    async fn announce(&self, publication: &Publication) {
        let outcome = match self.users.list_by_role(Role::User).await {
            Ok(audience) => {
                self.notifications
                    .notify_new_publication(publication, &audience)
                    .await
            }
            Err(e) => Err(e),
        };
        if let Err(e) = outcome {
            warn!(
                subsystem = "catalog",
                component = "publications",
                op = "announce",
                publication_id = %publication.id,
                error = %e,
                "New-publication fan-out failed"
            );
        }
    }

    async fn discard_blob(&self, blob_ref: &str) {
        if let Err(e) = self.blobs.delete(blob_ref).await {
            warn!(
                subsystem = "catalog",
                component = "publications",
                op = "delete_blob",
                file_ref = %blob_ref,
                error = %e,
                "Blob deletion failed"
            );
        }
    }

    /// Replace metadata. Only admins change the flagship flag.
    pub async fn update(
        &self,
        id: Uuid,
        metadata: PublicationMetadata,
        actor: &Actor,
    ) -> Result<Publication> {
        let current = self.require(id).await?;
        Self::check_owner(&current, actor)?;
        metadata.validate()?;
        self.require_category(metadata.category_id).await?;

        let mut metadata = metadata;
        metadata.title = metadata.title.trim().to_string();
        if !actor.is_admin() {
            metadata.is_flagship = current.is_flagship;
        }
        // Flag and metadata land in the same row write
        let publication = self.publications.update_metadata(id, &metadata).await?;

        info!(
            subsystem = "catalog",
            component = "publications",
            op = "update",
            publication_id = %id,
            user_id = %actor.user_id,
            "Publication updated"
        );
        Ok(publication)
    }

    /// Admin-only flagship toggle.
    pub async fn set_flagship(&self, id: Uuid, is_flagship: bool, actor: &Actor) -> Result<()> {
        if !actor.is_admin() {
            return Err(Error::Forbidden(
                "Only administrators may change flagship status".into(),
            ));
        }
        self.require(id).await?;
        self.publications.set_flagship(id, is_flagship).await?;

        info!(
            subsystem = "catalog",
            component = "publications",
            op = "set_flagship",
            publication_id = %id,
            is_flagship,
            "Flagship status changed"
        );
        Ok(())
    }

    /// Remove the stored file and cover, then the record.
    pub async fn delete(&self, id: Uuid, actor: &Actor) -> Result<()> {
        let publication = self.require(id).await?;
        Self::check_owner(&publication, actor)?;

        self.discard_blob(&publication.file_ref).await;
        if let Some(cover_ref) = &publication.cover_image_ref {
            self.discard_blob(cover_ref).await;
        }

        self.publications.delete(id).await?;
        info!(
            subsystem = "catalog",
            component = "publications",
            op = "delete",
            publication_id = %id,
            user_id = %actor.user_id,
            "Publication deleted"
        );
        Ok(())
    }

    /// Count the download, notify admins on a milestone crossing, and return
    /// the file bytes. A missing file fails before anything is counted.
    pub async fn download(&self, id: Uuid) -> Result<FileContent> {
        let mut publication = self.require(id).await?;

        let data = self
            .blobs
            .get(&publication.file_ref)
            .await?
            .ok_or_else(|| Error::FileMissing(publication.file_ref.clone()))?;

        let downloads = self
            .publications
            .increment_downloads(id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Publication {} not found", id)))?;
        publication.downloads = downloads;

        if let Some(threshold) = milestone::detect(downloads - 1, downloads) {
            info!(
                subsystem = "catalog",
                component = "publications",
                op = "milestone",
                publication_id = %id,
                threshold,
                "Download milestone crossed"
            );
            self.announce_milestone(&publication, threshold).await;
        }

        Ok(FileContent {
            file_name: publication.file_name,
            content_type: PDF_MIME.to_string(),
            data,
        })
    }

    async fn announce_milestone(&self, publication: &Publication, threshold: i64) {
        let outcome = match self.users.list_by_role(Role::Admin).await {
            Ok(admins) => {
                self.notifications
                    .notify_milestone(publication, threshold, &admins)
                    .await
            }
            Err(e) => Err(e),
        };
        if let Err(e) = outcome {
            warn!(
                subsystem = "catalog",
                component = "publications",
                op = "milestone",
                publication_id = %publication.id,
                threshold,
                error = %e,
                "Milestone fan-out failed"
            );
        }
    }

    pub async fn get_cover(&self, id: Uuid) -> Result<FileContent> {
        let publication = self.require(id).await?;
        let cover_ref = publication.cover_image_ref.ok_or(Error::NoCover(id))?;

        let data = self
            .blobs
            .get(&cover_ref)
            .await?
            .ok_or_else(|| Error::FileMissing(cover_ref.clone()))?;

        Ok(FileContent {
            file_name: format!("{}.jpg", id),
            content_type: COVER_MIME.to_string(),
            data,
        })
    }
}
