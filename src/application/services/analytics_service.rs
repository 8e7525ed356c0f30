//! Per-code click counters.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::domain::entities::{AnalyticsEntry, NewAnalyticsEntry};
use crate::domain::repositories::AnalyticsRepository;
use crate::error::AppError;

/// Maintains the analytics entry that accompanies every short code.
pub struct AnalyticsService {
    analytics: Arc<dyn AnalyticsRepository>,
}

impl AnalyticsService {
    pub fn new(analytics: Arc<dyn AnalyticsRepository>) -> Self {
        Self { analytics }
    }

    /// Creates a zeroed counter for a new short code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::DuplicateEntry`] if the code already has a counter.
    pub async fn create_entry(
        &self,
        short_code: &str,
        user_uuid: &str,
        created_at: DateTime<Utc>,
    ) -> Result<AnalyticsEntry, AppError> {
        self.analytics
            .create(NewAnalyticsEntry {
                short_code: short_code.to_string(),
                user_uuid: user_uuid.to_string(),
                created_at,
            })
            .await
    }

    /// Counts one redirect with a single atomic store update.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::EntryNotFound`] if the code has no counter.
    pub async fn record_access(&self, short_code: &str, at: DateTime<Utc>) -> Result<(), AppError> {
        if !self.analytics.record_access(short_code, at).await? {
            warn!(short_code, "Redirect target has no analytics entry");
            return Err(AppError::entry_not_found(short_code));
        }

        Ok(())
    }

    /// Removes the counter. Idempotent.
    pub async fn delete_entry(&self, short_code: &str) -> Result<(), AppError> {
        self.analytics.delete(short_code).await
    }

    /// # Errors
    ///
    /// Returns [`AppError::EntryNotFound`] if the code has no counter.
    pub async fn for_code(&self, short_code: &str) -> Result<AnalyticsEntry, AppError> {
        self.analytics
            .find_by_code(short_code)
            .await?
            .ok_or_else(|| AppError::entry_not_found(short_code))
    }

    pub async fn for_owner(&self, user_uuid: &str) -> Result<Vec<AnalyticsEntry>, AppError> {
        self.analytics.list_by_owner(user_uuid).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockAnalyticsRepository;

    #[tokio::test]
    async fn test_create_entry_starts_at_zero() {
        let mut repo = MockAnalyticsRepository::new();
        repo.expect_create()
            .withf(|new| new.short_code == "a1b2c3" && new.user_uuid == "user-1")
            .times(1)
            .returning(|new| Ok(new.into()));

        let entry = AnalyticsService::new(Arc::new(repo))
            .create_entry("a1b2c3", "user-1", Utc::now())
            .await
            .unwrap();

        assert_eq!(entry.total_clicks, 0);
        assert!(entry.time_stamp_last_accessed.is_none());
    }

    #[tokio::test]
    async fn test_create_entry_duplicate() {
        let mut repo = MockAnalyticsRepository::new();
        repo.expect_create()
            .returning(|new| Err(AppError::duplicate(new.short_code)));

        let result = AnalyticsService::new(Arc::new(repo))
            .create_entry("a1b2c3", "user-1", Utc::now())
            .await;
        assert!(matches!(result, Err(AppError::DuplicateEntry { .. })));
    }

    #[tokio::test]
    async fn test_record_access_on_missing_entry() {
        let mut repo = MockAnalyticsRepository::new();
        repo.expect_record_access()
            .times(1)
            .returning(|_, _| Ok(false));

        let result = AnalyticsService::new(Arc::new(repo))
            .record_access("a1b2c3", Utc::now())
            .await;
        assert!(matches!(result, Err(AppError::EntryNotFound { .. })));
    }

    #[tokio::test]
    async fn test_for_code_missing() {
        let mut repo = MockAnalyticsRepository::new();
        repo.expect_find_by_code().returning(|_| Ok(None));

        let result = AnalyticsService::new(Arc::new(repo))
            .for_code("a1b2c3")
            .await;
        assert!(matches!(result, Err(AppError::EntryNotFound { .. })));
    }
}
