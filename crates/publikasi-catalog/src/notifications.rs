//! Notification fan-out engine.
//!
//! Every event becomes one batch of per-recipient notifications that is
//! persisted all-or-nothing. Retrieval and read-state mutation are scoped to
//! the acting user; single-item operations verify ownership first.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use publikasi_core::defaults::{NOTIFICATION_PAGE_SIZE, NOTIFICATION_PAGE_SIZE_MAX};
use publikasi_core::{
    Error, NewNotification, Notification, NotificationPage, NotificationRepository,
    NotificationType, Publication, Result, Role, SecurityEventKind, UserAccount,
    ENTITY_PUBLICATION, ENTITY_USER,
};

/// Rendered title and message for a notification type.
pub mod templates {
    use publikasi_core::{NotificationType, SecurityEventKind};

    pub fn new_publication(title: &str) -> (String, String) {
        (
            "New publication!".to_string(),
            format!("{} is now available", title),
        )
    }

    pub fn milestone(title: &str, threshold: i64) -> (String, String) {
        (
            "Milestone reached!".to_string(),
            format!("{} has reached {} downloads", title, threshold),
        )
    }

    pub fn admin_new_user(email: &str) -> (String, String) {
        (
            "New user registered".to_string(),
            format!("New user {} has registered", email),
        )
    }

    pub fn security_event(kind: SecurityEventKind) -> (String, String) {
        match NotificationType::from(kind) {
            NotificationType::PasswordChanged => (
                "Password changed".to_string(),
                "Your password has been changed. If this was not you, contact an administrator immediately."
                    .to_string(),
            ),
            _ => (
                "Profile updated".to_string(),
                "Your profile has been updated successfully".to_string(),
            ),
        }
    }
}

/// Creates, lists and mutates notifications.
#[derive(Clone)]
pub struct NotificationService {
    repo: Arc<dyn NotificationRepository>,
}

impl NotificationService {
    pub fn new(repo: Arc<dyn NotificationRepository>) -> Self {
        Self { repo }
    }

    async fn fan_out(
        &self,
        op: &'static str,
        recipients: impl Iterator<Item = Uuid>,
        notification_type: NotificationType,
        (title, message): (String, String),
        related: (&str, Uuid),
    ) -> Result<usize> {
        let batch: Vec<NewNotification> = recipients
            .map(|recipient_id| NewNotification {
                recipient_id,
                title: title.clone(),
                message: message.clone(),
                notification_type,
                related_entity_type: Some(related.0.to_string()),
                related_entity_id: Some(related.1),
            })
            .collect();

        if batch.is_empty() {
            debug!(
                subsystem = "catalog",
                component = "notifications",
                op,
                "No recipients, nothing to fan out"
            );
            return Ok(0);
        }

        let inserted = self.repo.insert_batch(batch).await?;
        info!(
            subsystem = "catalog",
            component = "notifications",
            op,
            notification_type = notification_type.as_str(),
            recipient_count = inserted,
            "Fan-out complete"
        );
        Ok(inserted)
    }

    /// One NEW_PUBLICATION notification per regular user in `audience`.
    /// Admins are skipped even when passed in.
    pub async fn notify_new_publication(
        &self,
        publication: &Publication,
        audience: &[UserAccount],
    ) -> Result<usize> {
        self.fan_out(
            "notify_new_publication",
            audience
                .iter()
                .filter(|u| u.role == Role::User)
                .map(|u| u.id),
            NotificationType::NewPublication,
            templates::new_publication(&publication.title),
            (ENTITY_PUBLICATION, publication.id),
        )
        .await
    }

    /// One ADMIN_MILESTONE notification per admin.
    pub async fn notify_milestone(
        &self,
        publication: &Publication,
        threshold: i64,
        admins: &[UserAccount],
    ) -> Result<usize> {
        self.fan_out(
            "notify_milestone",
            admins
                .iter()
                .filter(|u| u.role == Role::Admin)
                .map(|u| u.id),
            NotificationType::AdminMilestone,
            templates::milestone(&publication.title, threshold),
            (ENTITY_PUBLICATION, publication.id),
        )
        .await
    }

    /// One ADMIN_NEW_USER notification per admin.
    pub async fn notify_admins_new_user(
        &self,
        new_user: &UserAccount,
        admins: &[UserAccount],
    ) -> Result<usize> {
        self.fan_out(
            "notify_admins_new_user",
            admins
                .iter()
                .filter(|u| u.role == Role::Admin)
                .map(|u| u.id),
            NotificationType::AdminNewUser,
            templates::admin_new_user(&new_user.email),
            (ENTITY_USER, new_user.id),
        )
        .await
    }

    /// A single security notice addressed to the affected user.
    pub async fn notify_security_event(
        &self,
        user_id: Uuid,
        kind: SecurityEventKind,
    ) -> Result<usize> {
        self.fan_out(
            "notify_security_event",
            std::iter::once(user_id),
            kind.into(),
            templates::security_event(kind),
            (ENTITY_USER, user_id),
        )
        .await
    }

    /// Newest-first page of a user's notifications. `page` is zero-based;
    /// `size` defaults to 20 and is clamped to 1..=100.
    pub async fn list_paged(
        &self,
        user_id: Uuid,
        page: i64,
        size: Option<i64>,
    ) -> Result<NotificationPage> {
        let page = page.max(0);
        let size = size
            .unwrap_or(NOTIFICATION_PAGE_SIZE)
            .clamp(1, NOTIFICATION_PAGE_SIZE_MAX);

        let (items, total) = self
            .repo
            .list_for_user(user_id, size, page.saturating_mul(size))
            .await?;

        Ok(NotificationPage {
            items,
            page,
            size,
            total,
            total_pages: (total + size - 1) / size,
        })
    }

    pub async fn list_unread(&self, user_id: Uuid) -> Result<Vec<Notification>> {
        self.repo.list_unread(user_id).await
    }

    pub async fn count_unread(&self, user_id: Uuid) -> Result<i64> {
        self.repo.count_unread(user_id).await
    }

    async fn owned(&self, id: Uuid, user_id: Uuid) -> Result<Notification> {
        let notification = self
            .repo
            .get(id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Notification {} not found", id)))?;

        if notification.recipient_id != user_id {
            return Err(Error::Forbidden(format!(
                "Notification {} belongs to another user",
                id
            )));
        }
        Ok(notification)
    }

    /// Flag one of the caller's notifications as read.
    pub async fn mark_read(&self, id: Uuid, user_id: Uuid) -> Result<()> {
        let notification = self.owned(id, user_id).await?;
        if !notification.is_read {
            self.repo.mark_read(id).await?;
        }
        Ok(())
    }

    pub async fn mark_all_read(&self, user_id: Uuid) -> Result<u64> {
        let updated = self.repo.mark_all_read(user_id).await?;
        info!(
            subsystem = "catalog",
            component = "notifications",
            op = "mark_all_read",
            user_id = %user_id,
            result_count = updated,
            "Notifications marked read"
        );
        Ok(updated)
    }

    /// Delete one of the caller's notifications.
    pub async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<()> {
        self.owned(id, user_id).await?;
        self.repo.delete(id).await?;
        info!(
            subsystem = "catalog",
            component = "notifications",
            op = "delete",
            notification_id = %id,
            "Notification deleted"
        );
        Ok(())
    }

    pub async fn clear_all_read(&self, user_id: Uuid) -> Result<u64> {
        let deleted = self.repo.delete_read(user_id).await?;
        info!(
            subsystem = "catalog",
            component = "notifications",
            op = "clear_all_read",
            user_id = %user_id,
            deleted_count = deleted,
            "Read notifications cleared"
        );
        Ok(deleted)
    }

    /// Unconditionally delete notifications created before `cutoff`.
    pub async fn purge_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64> {
        let deleted = self.repo.delete_older_than(cutoff).await?;
        info!(
            subsystem = "catalog",
            component = "notifications",
            op = "purge",
            cutoff = %cutoff,
            deleted_count = deleted,
            "Old notifications purged"
        );
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_templates_embed_entity_details() {
        assert_eq!(
            templates::new_publication("Census 2020"),
            (
                "New publication!".to_string(),
                "Census 2020 is now available".to_string()
            )
        );
        assert_eq!(
            templates::milestone("Census 2020", 500).1,
            "Census 2020 has reached 500 downloads"
        );
        assert_eq!(
            templates::admin_new_user("a@b.id").1,
            "New user a@b.id has registered"
        );
        assert_eq!(
            templates::security_event(SecurityEventKind::ProfileUpdated).0,
            "Profile updated"
        );
        assert!(templates::security_event(SecurityEventKind::PasswordChanged)
            .1
            .contains("contact an administrator"));
    }
}
