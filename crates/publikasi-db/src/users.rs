//! Read-only user directory backed by the `app_user` table.

use async_trait::async_trait;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use publikasi_core::{Error, Result, Role, UserAccount, UserDirectory};

/// PostgreSQL implementation of UserDirectory.
#[derive(Clone)]
pub struct PgUserDirectory {
    pool: Pool<Postgres>,
}

impl PgUserDirectory {
    /// Create a new PgUserDirectory with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for PgUserDirectory {
    async fn get(&self, id: Uuid) -> Result<Option<UserAccount>> {
        let row = sqlx::query(
            "SELECT id, email, full_name, role, created_at_utc FROM app_user WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        row.as_ref().map(account_from_row).transpose()
    }

    async fn list_by_role(&self, role: Role) -> Result<Vec<UserAccount>> {
        let rows = sqlx::query(
            "SELECT id, email, full_name, role, created_at_utc FROM app_user
             WHERE role = $1
             ORDER BY created_at_utc, id",
        )
        .bind(role.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        rows.iter().map(account_from_row).collect()
    }
}

fn account_from_row(r: &sqlx::postgres::PgRow) -> Result<UserAccount> {
    let role: String = r.get("role");
    Ok(UserAccount {
        id: r.get("id"),
        email: r.get("email"),
        full_name: r.get("full_name"),
        role: role.parse::<Role>().map_err(Error::Internal)?,
        created_at_utc: r.get("created_at_utc"),
    })
}
