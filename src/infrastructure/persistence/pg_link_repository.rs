//! PostgreSQL implementation of link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

use crate::domain::entities::{NewShortCodeEntry, ShortCodeEntry};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

#[derive(FromRow)]
struct ShortCodeRow {
    short_code: String,
    full_url: String,
    user_uuid: String,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl From<ShortCodeRow> for ShortCodeEntry {
    fn from(row: ShortCodeRow) -> Self {
        Self {
            short_code: row.short_code,
            full_url: row.full_url,
            user_uuid: row.user_uuid,
            created_at: row.created_at,
            expires_at: row.expires_at,
        }
    }
}

/// PostgreSQL repository for short-code entries.
///
/// Uniqueness is enforced by the primary key; creation uses
/// `ON CONFLICT DO NOTHING` so a collision is reported, never overwritten.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn create(&self, new_entry: NewShortCodeEntry) -> Result<ShortCodeEntry, AppError> {
        let row = sqlx::query_as::<_, ShortCodeRow>(
            r#"
            INSERT INTO short_codes (short_code, full_url, user_uuid, created_at, expires_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (short_code) DO NOTHING
            RETURNING short_code, full_url, user_uuid, created_at, expires_at
            "#,
        )
        .bind(&new_entry.short_code)
        .bind(&new_entry.full_url)
        .bind(&new_entry.user_uuid)
        .bind(new_entry.created_at)
        .bind(new_entry.expires_at)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(Into::into)
            .ok_or_else(|| AppError::duplicate(new_entry.short_code))
    }

    async fn find_by_code(&self, short_code: &str) -> Result<Option<ShortCodeEntry>, AppError> {
        let row = sqlx::query_as::<_, ShortCodeRow>(
            r#"
            SELECT short_code, full_url, user_uuid, created_at, expires_at
            FROM short_codes
            WHERE short_code = $1
            "#,
        )
        .bind(short_code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn list_by_owner(&self, user_uuid: &str) -> Result<Vec<ShortCodeEntry>, AppError> {
        let rows = sqlx::query_as::<_, ShortCodeRow>(
            r#"
            SELECT short_code, full_url, user_uuid, created_at, expires_at
            FROM short_codes
            WHERE user_uuid = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_uuid)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn count_by_owner(&self, user_uuid: &str) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM short_codes WHERE user_uuid = $1")
            .bind(user_uuid)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }

    async fn update_full_url(
        &self,
        short_code: &str,
        full_url: &str,
    ) -> Result<ShortCodeEntry, AppError> {
        let row = sqlx::query_as::<_, ShortCodeRow>(
            r#"
            UPDATE short_codes
            SET full_url = $2
            WHERE short_code = $1
            RETURNING short_code, full_url, user_uuid, created_at, expires_at
            "#,
        )
        .bind(short_code)
        .bind(full_url)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(Into::into)
            .ok_or_else(|| AppError::entry_not_found(short_code))
    }

    async fn delete(&self, short_code: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM short_codes WHERE short_code = $1")
            .bind(short_code)
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }

    async fn list_expired(&self, now: DateTime<Utc>) -> Result<Vec<ShortCodeEntry>, AppError> {
        let rows = sqlx::query_as::<_, ShortCodeRow>(
            r#"
            SELECT short_code, full_url, user_uuid, created_at, expires_at
            FROM short_codes
            WHERE expires_at <= $1
            ORDER BY expires_at
            "#,
        )
        .bind(now)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }
}
