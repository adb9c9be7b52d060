//! PostgreSQL user directory implementation
//!
//! Expects a table of the shape:
//!
//! ```sql
//! CREATE TABLE users (
//!     id        BIGINT PRIMARY KEY,
//!     role      TEXT,
//!     auth_time TIMESTAMPTZ
//! );
//! ```
//!
//! `TIMESTAMPTZ` keeps microseconds, so written auth times come back
//! truncated to microsecond precision.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tessera_types::{Role, UserId};

use crate::error::{DbError, DbResult};
use crate::models::UserRow;
use crate::repo::UserDirectory;

/// PostgreSQL user directory
#[derive(Clone)]
pub struct PgUserDirectory {
    pool: PgPool,
}

impl PgUserDirectory {
    /// Create a new user directory
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a user row by ID
    pub async fn find_by_id(&self, user_id: UserId) -> DbResult<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, role, auth_time
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id.0)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }
}

#[async_trait]
impl UserDirectory for PgUserDirectory {
    async fn set_auth_time(&self, user_id: UserId, auth_time: DateTime<Utc>) -> DbResult<()> {
        // The statement completes only after commit (autocommit), so a
        // following read on any connection observes it.
        let result = sqlx::query("UPDATE users SET auth_time = $1 WHERE id = $2")
            .bind(auth_time)
            .bind(user_id.0)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound);
        }

        Ok(())
    }

    async fn get_auth_time(&self, user_id: UserId) -> DbResult<Option<DateTime<Utc>>> {
        let row = self.find_by_id(user_id).await?.ok_or(DbError::NotFound)?;
        Ok(row.auth_time)
    }

    async fn exists(&self, user_id: UserId) -> DbResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
            .bind(user_id.0)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }

    async fn get_role(&self, user_id: UserId) -> DbResult<Option<Role>> {
        let row = self.find_by_id(user_id).await?;
        decode_role(row.and_then(|r| r.role))
    }
}

impl std::fmt::Debug for PgUserDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgUserDirectory").finish_non_exhaustive()
    }
}

/// Decode a stored role column
///
/// NULL maps to `None`. A string outside the role set is a data error, not a
/// missing role.
fn decode_role(raw: Option<String>) -> DbResult<Option<Role>> {
    match raw {
        None => Ok(None),
        Some(s) => s.parse::<Role>().map(Some).map_err(|e| {
            tracing::error!(role = %s, "Unrecognized role stored in users table");
            DbError::InvalidValue(e.to_string())
        }),
    }
}
