//! Notification repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres, Row};
use tracing::debug;
use uuid::Uuid;

use publikasi_core::{
    Error, NewNotification, Notification, NotificationRepository, NotificationType, Result,
};

const NOTIFICATION_COLUMNS: &str = r#"
    id, recipient_id, title, message, notification_type,
    related_entity_type, related_entity_id, is_read, created_at_utc
"#;

/// PostgreSQL implementation of NotificationRepository.
#[derive(Clone)]
pub struct PgNotificationRepository {
    pool: Pool<Postgres>,
}

impl PgNotificationRepository {
    /// Create a new PgNotificationRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationRepository for PgNotificationRepository {
    async fn insert_batch(&self, batch: Vec<NewNotification>) -> Result<usize> {
        if batch.is_empty() {
            return Ok(0);
        }

        let now = Utc::now();
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        for item in &batch {
            sqlx::query(
                r#"
                INSERT INTO notification (
                    id, recipient_id, title, message, notification_type,
                    related_entity_type, related_entity_id, is_read, created_at_utc
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, FALSE, $8)
                "#,
            )
            .bind(Uuid::now_v7())
            .bind(item.recipient_id)
            .bind(&item.title)
            .bind(&item.message)
            .bind(item.notification_type.as_str())
            .bind(&item.related_entity_type)
            .bind(item.related_entity_id)
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?;
        }

        tx.commit().await.map_err(Error::Database)?;

        debug!(
            subsystem = "database",
            component = "notifications",
            op = "insert_batch",
            recipient_count = batch.len(),
            "Notification batch committed"
        );
        Ok(batch.len())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Notification>> {
        let row = sqlx::query(&format!(
            "SELECT {NOTIFICATION_COLUMNS} FROM notification WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        row.as_ref().map(notification_from_row).transpose()
    }

    async fn list_for_user(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Notification>, i64)> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM notification WHERE recipient_id = $1")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await
                .map_err(Error::Database)?;

        let rows = sqlx::query(&format!(
            "SELECT {NOTIFICATION_COLUMNS} FROM notification
             WHERE recipient_id = $1
             ORDER BY created_at_utc DESC, id DESC
             LIMIT $2 OFFSET $3"
        ))
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        let items = rows
            .iter()
            .map(notification_from_row)
            .collect::<Result<Vec<_>>>()?;
        Ok((items, total))
    }

    async fn list_unread(&self, user_id: Uuid) -> Result<Vec<Notification>> {
        let rows = sqlx::query(&format!(
            "SELECT {NOTIFICATION_COLUMNS} FROM notification
             WHERE recipient_id = $1 AND NOT is_read
             ORDER BY created_at_utc DESC, id DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        rows.iter().map(notification_from_row).collect()
    }

    async fn count_unread(&self, user_id: Uuid) -> Result<i64> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM notification WHERE recipient_id = $1 AND NOT is_read",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)
    }

    async fn mark_read(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("UPDATE notification SET is_read = TRUE WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("Notification {} not found", id)));
        }
        Ok(())
    }

    async fn mark_all_read(&self, user_id: Uuid) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE notification SET is_read = TRUE WHERE recipient_id = $1 AND NOT is_read",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(result.rows_affected())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM notification WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("Notification {} not found", id)));
        }
        Ok(())
    }

    async fn delete_read(&self, user_id: Uuid) -> Result<u64> {
        let result = sqlx::query("DELETE FROM notification WHERE recipient_id = $1 AND is_read")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        Ok(result.rows_affected())
    }

    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64> {
        let result = sqlx::query("DELETE FROM notification WHERE created_at_utc < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        Ok(result.rows_affected())
    }
}

fn notification_from_row(r: &sqlx::postgres::PgRow) -> Result<Notification> {
    let type_str: String = r.get("notification_type");
    let notification_type = type_str
        .parse::<NotificationType>()
        .map_err(Error::Internal)?;

    Ok(Notification {
        id: r.get("id"),
        recipient_id: r.get("recipient_id"),
        title: r.get("title"),
        message: r.get("message"),
        notification_type,
        related_entity_type: r.get("related_entity_type"),
        related_entity_id: r.get("related_entity_id"),
        is_read: r.get("is_read"),
        created_at_utc: r.get("created_at_utc"),
    })
}
