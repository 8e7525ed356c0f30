//! PostgreSQL implementation of analytics repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

use crate::domain::entities::{AnalyticsEntry, NewAnalyticsEntry};
use crate::domain::repositories::AnalyticsRepository;
use crate::error::AppError;

#[derive(FromRow)]
struct AnalyticsRow {
    short_code: String,
    user_uuid: String,
    total_clicks: i64,
    time_stamp_last_accessed: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl From<AnalyticsRow> for AnalyticsEntry {
    fn from(row: AnalyticsRow) -> Self {
        Self {
            short_code: row.short_code,
            user_uuid: row.user_uuid,
            total_clicks: row.total_clicks,
            time_stamp_last_accessed: row.time_stamp_last_accessed,
            created_at: row.created_at,
        }
    }
}

/// PostgreSQL repository for click counters.
///
/// Clicks are counted with `total_clicks = total_clicks + 1` in one
/// statement, so concurrent redirects never lose increments.
pub struct PgAnalyticsRepository {
    pool: Arc<PgPool>,
}

impl PgAnalyticsRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AnalyticsRepository for PgAnalyticsRepository {
    async fn create(&self, new_entry: NewAnalyticsEntry) -> Result<AnalyticsEntry, AppError> {
        let row = sqlx::query_as::<_, AnalyticsRow>(
            r#"
            INSERT INTO analytics (short_code, user_uuid, total_clicks, time_stamp_last_accessed, created_at)
            VALUES ($1, $2, 0, NULL, $3)
            ON CONFLICT (short_code) DO NOTHING
            RETURNING short_code, user_uuid, total_clicks, time_stamp_last_accessed, created_at
            "#,
        )
        .bind(&new_entry.short_code)
        .bind(&new_entry.user_uuid)
        .bind(new_entry.created_at)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(Into::into)
            .ok_or_else(|| AppError::duplicate(new_entry.short_code))
    }

    async fn record_access(&self, short_code: &str, at: DateTime<Utc>) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE analytics
            SET total_clicks = total_clicks + 1, time_stamp_last_accessed = $2
            WHERE short_code = $1
            "#,
        )
        .bind(short_code)
        .bind(at)
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn find_by_code(&self, short_code: &str) -> Result<Option<AnalyticsEntry>, AppError> {
        let row = sqlx::query_as::<_, AnalyticsRow>(
            r#"
            SELECT short_code, user_uuid, total_clicks, time_stamp_last_accessed, created_at
            FROM analytics
            WHERE short_code = $1
            "#,
        )
        .bind(short_code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn list_by_owner(&self, user_uuid: &str) -> Result<Vec<AnalyticsEntry>, AppError> {
        let rows = sqlx::query_as::<_, AnalyticsRow>(
            r#"
            SELECT short_code, user_uuid, total_clicks, time_stamp_last_accessed, created_at
            FROM analytics
            WHERE user_uuid = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_uuid)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn delete(&self, short_code: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM analytics WHERE short_code = $1")
            .bind(short_code)
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }
}
