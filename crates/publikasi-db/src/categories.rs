//! Category repository implementation.
//!
//! Structural guards (parent level, children, publications) are re-checked
//! under row locks inside the mutating transaction, so concurrent hierarchy
//! changes cannot slip past the service-level checks.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Postgres, Row, Transaction};
use uuid::Uuid;

use publikasi_core::{
    Category, CategoryRepository, Error, NewCategory, Result, ROOT_LEVEL, SUB_LEVEL,
};

use crate::is_unique_violation;

const CATEGORY_COLUMNS: &str = r#"
    c.id, c.name, c.description, c.parent_id, c.level, c.display_order, c.created_at_utc,
    COALESCE((SELECT COUNT(*) FROM publication WHERE category_id = c.id), 0) AS publication_count
"#;

/// PostgreSQL implementation of CategoryRepository.
#[derive(Clone)]
pub struct PgCategoryRepository {
    pool: Pool<Postgres>,
}

impl PgCategoryRepository {
    /// Create a new PgCategoryRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Lock `parent_id` and verify it can own children.
    async fn lock_parent_tx(tx: &mut Transaction<'_, Postgres>, parent_id: Uuid) -> Result<()> {
        let level: Option<i32> =
            sqlx::query_scalar("SELECT level FROM category WHERE id = $1 FOR SHARE")
                .bind(parent_id)
                .fetch_optional(&mut **tx)
                .await
                .map_err(Error::Database)?;

        match level {
            None => Err(Error::ParentNotFound(parent_id)),
            Some(level) if level != ROOT_LEVEL => Err(Error::DepthExceeded(parent_id)),
            Some(_) => Ok(()),
        }
    }

    async fn count_children_tx(tx: &mut Transaction<'_, Postgres>, id: Uuid) -> Result<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM category WHERE parent_id = $1")
            .bind(id)
            .fetch_one(&mut **tx)
            .await
            .map_err(Error::Database)
    }
}

#[async_trait]
impl CategoryRepository for PgCategoryRepository {
    async fn insert(&self, category: NewCategory) -> Result<Category> {
        let id = Uuid::now_v7();
        let now = Utc::now();
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        if let Some(parent_id) = category.parent_id {
            Self::lock_parent_tx(&mut tx, parent_id).await?;
        }

        sqlx::query(
            "INSERT INTO category (id, name, description, parent_id, level, display_order, created_at_utc)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(id)
        .bind(&category.name)
        .bind(&category.description)
        .bind(category.parent_id)
        .bind(category.level)
        .bind(category.display_order)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                Error::DuplicateName(category.name.clone())
            } else {
                Error::Database(e)
            }
        })?;

        tx.commit().await.map_err(Error::Database)?;

        Ok(Category {
            id,
            name: category.name,
            description: category.description,
            parent_id: category.parent_id,
            level: category.level,
            display_order: category.display_order,
            created_at_utc: now,
            publication_count: 0,
        })
    }

    async fn get(&self, id: Uuid) -> Result<Option<Category>> {
        let row = sqlx::query(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM category c WHERE c.id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(row.map(|r| category_from_row(&r)))
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<Category>> {
        let row = sqlx::query(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM category c WHERE c.name = $1"
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(row.map(|r| category_from_row(&r)))
    }

    async fn list_all(&self) -> Result<Vec<Category>> {
        let rows = sqlx::query(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM category c ORDER BY c.level, c.display_order, c.name"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows.iter().map(category_from_row).collect())
    }

    async fn list_children(&self, parent_id: Option<Uuid>) -> Result<Vec<Category>> {
        let rows = if let Some(pid) = parent_id {
            sqlx::query(&format!(
                "SELECT {CATEGORY_COLUMNS} FROM category c
                 WHERE c.parent_id = $1
                 ORDER BY c.display_order, c.name"
            ))
            .bind(pid)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?
        } else {
            sqlx::query(&format!(
                "SELECT {CATEGORY_COLUMNS} FROM category c
                 WHERE c.parent_id IS NULL
                 ORDER BY c.display_order, c.name"
            ))
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?
        };

        Ok(rows.iter().map(category_from_row).collect())
    }

    async fn update(&self, category: &Category) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        let exists: Option<Uuid> =
            sqlx::query_scalar("SELECT id FROM category WHERE id = $1 FOR UPDATE")
                .bind(category.id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(Error::Database)?;
        if exists.is_none() {
            return Err(Error::NotFound(format!("Category {} not found", category.id)));
        }

        if let Some(parent_id) = category.parent_id {
            if parent_id == category.id {
                return Err(Error::SelfParent(category.id));
            }
            Self::lock_parent_tx(&mut tx, parent_id).await?;
            if Self::count_children_tx(&mut tx, category.id).await? > 0 {
                return Err(Error::HasChildren(category.id));
            }
        }

        let level = if category.parent_id.is_some() {
            SUB_LEVEL
        } else {
            ROOT_LEVEL
        };

        sqlx::query(
            "UPDATE category
             SET name = $1, description = $2, parent_id = $3, level = $4, display_order = $5
             WHERE id = $6",
        )
        .bind(&category.name)
        .bind(&category.description)
        .bind(category.parent_id)
        .bind(level)
        .bind(category.display_order)
        .bind(category.id)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                Error::DuplicateName(category.name.clone())
            } else {
                Error::Database(e)
            }
        })?;

        tx.commit().await.map_err(Error::Database)?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        let exists: Option<Uuid> =
            sqlx::query_scalar("SELECT id FROM category WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(Error::Database)?;
        if exists.is_none() {
            return Err(Error::NotFound(format!("Category {} not found", id)));
        }

        let publications: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM publication WHERE category_id = $1")
                .bind(id)
                .fetch_one(&mut *tx)
                .await
                .map_err(Error::Database)?;
        if publications > 0 {
            return Err(Error::HasPublications {
                id,
                count: publications,
            });
        }

        if Self::count_children_tx(&mut tx, id).await? > 0 {
            return Err(Error::HasChildren(id));
        }

        sqlx::query("DELETE FROM category WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?;

        tx.commit().await.map_err(Error::Database)?;
        Ok(())
    }

    async fn count_children(&self, id: Uuid) -> Result<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM category WHERE parent_id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(Error::Database)
    }
}

fn category_from_row(r: &sqlx::postgres::PgRow) -> Category {
    Category {
        id: r.get("id"),
        name: r.get("name"),
        description: r.get("description"),
        parent_id: r.get("parent_id"),
        level: r.get("level"),
        display_order: r.get("display_order"),
        created_at_utc: r.get("created_at_utc"),
        publication_count: r.get("publication_count"),
    }
}
