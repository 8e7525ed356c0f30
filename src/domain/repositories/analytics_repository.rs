//! Repository trait for click analytics.

use crate::domain::entities::{AnalyticsEntry, NewAnalyticsEntry};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Repository interface for per-code click counters.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgAnalyticsRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryStore`] - in-process implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnalyticsRepository: Send + Sync {
    /// Creates a zeroed counter if none exists for the short code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::DuplicateEntry`] if an entry already exists.
    /// Returns [`AppError::StoreUnavailable`] on store errors.
    async fn create(&self, new_entry: NewAnalyticsEntry) -> Result<AnalyticsEntry, AppError>;

    /// Atomically adds one click and stamps the access time.
    ///
    /// Must be a single store-side update, never a read followed by a write.
    ///
    /// # Returns
    ///
    /// - `Ok(true)` if the counter was incremented
    /// - `Ok(false)` if no entry exists for the short code
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StoreUnavailable`] on store errors.
    async fn record_access(&self, short_code: &str, at: DateTime<Utc>) -> Result<bool, AppError>;

    /// Finds the counter for a short code.
    async fn find_by_code(&self, short_code: &str) -> Result<Option<AnalyticsEntry>, AppError>;

    /// Lists counters for every code owned by a user.
    async fn list_by_owner(&self, user_uuid: &str) -> Result<Vec<AnalyticsEntry>, AppError>;

    /// Deletes the counter. Deleting an absent entry is not an error.
    async fn delete(&self, short_code: &str) -> Result<(), AppError>;
}
