//! PostgreSQL implementation of quota repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

use crate::domain::entities::UserQuota;
use crate::domain::repositories::QuotaRepository;
use crate::error::AppError;

#[derive(FromRow)]
struct QuotaRow {
    user_uuid: String,
    requests_in_window: i64,
    time_of_last_request: Option<DateTime<Utc>>,
    version: i64,
}

impl From<QuotaRow> for UserQuota {
    fn from(row: QuotaRow) -> Self {
        Self {
            user_uuid: row.user_uuid,
            requests_in_window: row.requests_in_window,
            time_of_last_request: row.time_of_last_request,
            version: row.version,
        }
    }
}

/// PostgreSQL repository for per-user quota records.
///
/// Compare-and-swap is a single `UPDATE .. WHERE version = $n`; zero affected
/// rows means a concurrent writer won or the record is gone.
pub struct PgQuotaRepository {
    pool: Arc<PgPool>,
}

impl PgQuotaRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QuotaRepository for PgQuotaRepository {
    async fn create(&self, user_uuid: &str) -> Result<UserQuota, AppError> {
        let row = sqlx::query_as::<_, QuotaRow>(
            r#"
            INSERT INTO user_quotas (user_uuid, requests_in_window, time_of_last_request, version)
            VALUES ($1, 0, NULL, 0)
            ON CONFLICT (user_uuid) DO NOTHING
            RETURNING user_uuid, requests_in_window, time_of_last_request, version
            "#,
        )
        .bind(user_uuid)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(Into::into)
            .ok_or_else(|| AppError::duplicate(user_uuid))
    }

    async fn find(&self, user_uuid: &str) -> Result<Option<UserQuota>, AppError> {
        let row = sqlx::query_as::<_, QuotaRow>(
            r#"
            SELECT user_uuid, requests_in_window, time_of_last_request, version
            FROM user_quotas
            WHERE user_uuid = $1
            "#,
        )
        .bind(user_uuid)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn compare_and_swap(
        &self,
        updated: &UserQuota,
        expected_version: i64,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE user_quotas
            SET requests_in_window = $2, time_of_last_request = $3, version = $4
            WHERE user_uuid = $1 AND version = $5
            "#,
        )
        .bind(&updated.user_uuid)
        .bind(updated.requests_in_window)
        .bind(updated.time_of_last_request)
        .bind(updated.version)
        .bind(expected_version)
        .execute(self.pool.as_ref())
        .await?;

        if result.rows_affected() == 1 {
            return Ok(true);
        }

        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM user_quotas WHERE user_uuid = $1)")
                .bind(&updated.user_uuid)
                .fetch_one(self.pool.as_ref())
                .await?;

        if exists {
            Ok(false)
        } else {
            Err(AppError::UserNotFound)
        }
    }
}
