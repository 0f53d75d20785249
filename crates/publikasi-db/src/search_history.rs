//! Search history repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use publikasi_core::{Error, Result, SearchHistoryEntry, SearchHistoryRepository};

/// PostgreSQL implementation of SearchHistoryRepository.
#[derive(Clone)]
pub struct PgSearchHistoryRepository {
    pool: Pool<Postgres>,
}

impl PgSearchHistoryRepository {
    /// Create a new PgSearchHistoryRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SearchHistoryRepository for PgSearchHistoryRepository {
    async fn find(&self, user_id: Uuid, keyword: &str) -> Result<Option<SearchHistoryEntry>> {
        let row = sqlx::query(
            "SELECT id, user_id, keyword, searched_at_utc FROM search_history
             WHERE user_id = $1 AND keyword = $2",
        )
        .bind(user_id)
        .bind(keyword)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(row.as_ref().map(entry_from_row))
    }

    // A concurrent insert of the same pair collapses into a timestamp update.
    async fn insert(
        &self,
        user_id: Uuid,
        keyword: &str,
        searched_at: DateTime<Utc>,
    ) -> Result<SearchHistoryEntry> {
        let row = sqlx::query(
            r#"
            INSERT INTO search_history (id, user_id, keyword, searched_at_utc)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id, keyword)
            DO UPDATE SET searched_at_utc = EXCLUDED.searched_at_utc
            RETURNING id, user_id, keyword, searched_at_utc
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(user_id)
        .bind(keyword)
        .bind(searched_at)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(entry_from_row(&row))
    }

    async fn touch(&self, id: Uuid, searched_at: DateTime<Utc>) -> Result<()> {
        let result = sqlx::query("UPDATE search_history SET searched_at_utc = $2 WHERE id = $1")
            .bind(id)
            .bind(searched_at)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("Search history entry {} not found", id)));
        }
        Ok(())
    }

    async fn list_recent(&self, user_id: Uuid, limit: i64) -> Result<Vec<SearchHistoryEntry>> {
        let rows = sqlx::query(
            "SELECT id, user_id, keyword, searched_at_utc FROM search_history
             WHERE user_id = $1
             ORDER BY searched_at_utc DESC, id DESC
             LIMIT $2",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows.iter().map(entry_from_row).collect())
    }

    async fn delete_for_user(&self, user_id: Uuid) -> Result<u64> {
        let result = sqlx::query("DELETE FROM search_history WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        Ok(result.rows_affected())
    }
}

fn entry_from_row(r: &sqlx::postgres::PgRow) -> SearchHistoryEntry {
    SearchHistoryEntry {
        id: r.get("id"),
        user_id: r.get("user_id"),
        keyword: r.get("keyword"),
        searched_at_utc: r.get("searched_at_utc"),
    }
}
