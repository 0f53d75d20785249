//! Publication repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use publikasi_core::{
    Error, NewPublication, Publication, PublicationFilter, PublicationMetadata,
    PublicationRepository, PublicationSort, Result,
};

use crate::publication_filter::{PublicationFilterQueryBuilder, QueryParam};
use crate::escape_like;

const PUBLICATION_COLUMNS: &str = r#"
    p.id, p.title, p.description, p.catalog_number, p.publication_number, p.issn_isbn,
    p.release_frequency, p.release_date, p.language, p.year, p.author,
    p.cover_image_ref, p.file_ref, p.file_name, p.file_size,
    p.views, p.downloads, p.category_id, p.uploaded_by, p.is_flagship,
    p.created_at_utc, p.updated_at_utc
"#;

/// PostgreSQL implementation of PublicationRepository.
#[derive(Clone)]
pub struct PgPublicationRepository {
    pool: Pool<Postgres>,
}

impl PgPublicationRepository {
    /// Create a new PgPublicationRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    async fn fetch_ordered(&self, order_by: &str, limit: Option<i64>) -> Result<Vec<Publication>> {
        let sql = match limit {
            Some(_) => format!(
                "SELECT {PUBLICATION_COLUMNS} FROM publication p {order_by} LIMIT $1"
            ),
            None => format!("SELECT {PUBLICATION_COLUMNS} FROM publication p {order_by}"),
        };

        let mut q = sqlx::query(&sql);
        if let Some(limit) = limit {
            q = q.bind(limit);
        }

        let rows = q.fetch_all(&self.pool).await.map_err(Error::Database)?;
        Ok(rows.iter().map(publication_from_row).collect())
    }

    async fn increment_counter(&self, column: &'static str, id: Uuid) -> Result<Option<i64>> {
        sqlx::query_scalar(&format!(
            "UPDATE publication SET {column} = {column} + 1 WHERE id = $1 RETURNING {column}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)
    }
}

#[async_trait]
impl PublicationRepository for PgPublicationRepository {
    async fn insert(&self, publication: NewPublication) -> Result<Publication> {
        let id = Uuid::now_v7();
        let now = Utc::now();
        let meta = &publication.metadata;

        sqlx::query(
            r#"
            INSERT INTO publication (
                id, title, description, catalog_number, publication_number, issn_isbn,
                release_frequency, release_date, language, year, author,
                cover_image_ref, file_ref, file_name, file_size,
                views, downloads, category_id, uploaded_by, is_flagship,
                created_at_utc, updated_at_utc
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15,
                    0, 0, $16, $17, $18, $19, $19)
            "#,
        )
        .bind(id)
        .bind(meta.title.trim())
        .bind(&meta.description)
        .bind(&meta.catalog_number)
        .bind(&meta.publication_number)
        .bind(&meta.issn_isbn)
        .bind(&meta.release_frequency)
        .bind(meta.release_date)
        .bind(&meta.language)
        .bind(meta.year)
        .bind(&meta.author)
        .bind(&publication.cover_image_ref)
        .bind(&publication.file_ref)
        .bind(&publication.file_name)
        .bind(publication.file_size)
        .bind(meta.category_id)
        .bind(publication.uploaded_by)
        .bind(meta.is_flagship)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(Publication {
            id,
            title: meta.title.trim().to_string(),
            description: meta.description.clone(),
            catalog_number: meta.catalog_number.clone(),
            publication_number: meta.publication_number.clone(),
            issn_isbn: meta.issn_isbn.clone(),
            release_frequency: meta.release_frequency.clone(),
            release_date: meta.release_date,
            language: meta.language.clone(),
            year: meta.year,
            author: meta.author.clone(),
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
        })
    }

    async fn get(&self, id: Uuid) -> Result<Option<Publication>> {
        let row = sqlx::query(&format!(
            "SELECT {PUBLICATION_COLUMNS} FROM publication p WHERE p.id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(row.as_ref().map(publication_from_row))
    }

    async fn update_metadata(
        &self,
        id: Uuid,
        metadata: &PublicationMetadata,
    ) -> Result<Publication> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE publication p
            SET title = $2, description = $3, catalog_number = $4, publication_number = $5,
                issn_isbn = $6, release_frequency = $7, release_date = $8, language = $9,
                year = $10, author = $11, category_id = $12, is_flagship = $13,
                updated_at_utc = $14
            WHERE p.id = $1
            RETURNING {PUBLICATION_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(metadata.title.trim())
        .bind(&metadata.description)
        .bind(&metadata.catalog_number)
        .bind(&metadata.publication_number)
        .bind(&metadata.issn_isbn)
        .bind(&metadata.release_frequency)
        .bind(metadata.release_date)
        .bind(&metadata.language)
        .bind(metadata.year)
        .bind(&metadata.author)
        .bind(metadata.category_id)
        .bind(metadata.is_flagship)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        row.as_ref()
            .map(publication_from_row)
            .ok_or_else(|| Error::NotFound(format!("Publication {} not found", id)))
    }

    async fn set_flagship(&self, id: Uuid, is_flagship: bool) -> Result<()> {
        let result = sqlx::query(
            "UPDATE publication SET is_flagship = $2, updated_at_utc = $3 WHERE id = $1",
        )
        .bind(id)
        .bind(is_flagship)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("Publication {} not found", id)));
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM publication WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("Publication {} not found", id)));
        }
        Ok(())
    }

    async fn search(
        &self,
        filter: &PublicationFilter,
        sort: Option<PublicationSort>,
    ) -> Result<Vec<Publication>> {
        let (where_clause, params) =
            PublicationFilterQueryBuilder::new(filter.clone(), 0).build();
        let sql = format!(
            "SELECT {PUBLICATION_COLUMNS} FROM publication p WHERE {} {}",
            where_clause,
            PublicationFilterQueryBuilder::order_by(sort)
        );

        let mut q = sqlx::query(&sql);
        for param in &params {
            q = match param {
                QueryParam::Uuid(id) => q.bind(id),
                QueryParam::Int(val) => q.bind(val),
                QueryParam::String(s) => q.bind(s),
            };
        }

        let rows = q.fetch_all(&self.pool).await.map_err(Error::Database)?;
        Ok(rows.iter().map(publication_from_row).collect())
    }

    async fn latest(&self, limit: i64) -> Result<Vec<Publication>> {
        self.fetch_ordered("ORDER BY p.created_at_utc DESC, p.id DESC", Some(limit))
            .await
    }

    async fn most_downloaded(&self, limit: i64) -> Result<Vec<Publication>> {
        self.fetch_ordered("ORDER BY p.downloads DESC, p.id ASC", Some(limit))
            .await
    }

    async fn most_viewed(&self, limit: i64) -> Result<Vec<Publication>> {
        self.fetch_ordered("ORDER BY p.views DESC, p.id ASC", Some(limit))
            .await
    }

    async fn flagship(&self) -> Result<Vec<Publication>> {
        let rows = sqlx::query(&format!(
            "SELECT {PUBLICATION_COLUMNS} FROM publication p
             WHERE p.is_flagship
             ORDER BY p.updated_at_utc DESC, p.id DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows.iter().map(publication_from_row).collect())
    }

    async fn count_flagship(&self) -> Result<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM publication WHERE is_flagship")
            .fetch_one(&self.pool)
            .await
            .map_err(Error::Database)
    }

    async fn list_by_uploader(&self, user_id: Uuid) -> Result<Vec<Publication>> {
        let rows = sqlx::query(&format!(
            "SELECT {PUBLICATION_COLUMNS} FROM publication p
             WHERE p.uploaded_by = $1
             ORDER BY p.created_at_utc DESC, p.id DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows.iter().map(publication_from_row).collect())
    }

    async fn suggest_titles(&self, keyword: &str, limit: i64) -> Result<Vec<String>> {
        sqlx::query_scalar(
            "SELECT title FROM (
                 SELECT DISTINCT title FROM publication
                 WHERE title ILIKE $1 ESCAPE '\\'
             ) t
             ORDER BY lower(title), title COLLATE \"C\"
             LIMIT $2",
        )
        .bind(format!("%{}%", escape_like(keyword)))
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)
    }

    async fn count_by_category(&self, category_id: Uuid) -> Result<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM publication WHERE category_id = $1")
            .bind(category_id)
            .fetch_one(&self.pool)
            .await
            .map_err(Error::Database)
    }

    async fn increment_views(&self, id: Uuid) -> Result<Option<i64>> {
        self.increment_counter("views", id).await
    }

    async fn increment_downloads(&self, id: Uuid) -> Result<Option<i64>> {
        self.increment_counter("downloads", id).await
    }
}

fn publication_from_row(r: &sqlx::postgres::PgRow) -> Publication {
    Publication {
        id: r.get("id"),
        title: r.get("title"),
        description: r.get("description"),
        catalog_number: r.get("catalog_number"),
        publication_number: r.get("publication_number"),
        issn_isbn: r.get("issn_isbn"),
        release_frequency: r.get("release_frequency"),
        release_date: r.get("release_date"),
        language: r.get("language"),
        year: r.get("year"),
        author: r.get("author"),
        cover_image_ref: r.get("cover_image_ref"),
        file_ref: r.get("file_ref"),
        file_name: r.get("file_name"),
        file_size: r.get("file_size"),
        views: r.get("views"),
        downloads: r.get("downloads"),
        category_id: r.get("category_id"),
        uploaded_by: r.get("uploaded_by"),
        is_flagship: r.get("is_flagship"),
        created_at_utc: r.get("created_at_utc"),
        updated_at_utc: r.get("updated_at_utc"),
    }
}
