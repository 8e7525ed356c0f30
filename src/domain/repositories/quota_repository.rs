//! Repository trait for per-user quota records.

use crate::domain::entities::UserQuota;
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for user quota records.
///
/// Writes are conditional on the stored `version`, which lets the rate
/// limiter run a compare-and-swap loop instead of a racy read-then-put.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgQuotaRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryStore`] - in-process implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuotaRepository: Send + Sync {
    /// Creates the record for a newly confirmed user with a zero counter.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::DuplicateEntry`] if a record already exists.
    /// Returns [`AppError::StoreUnavailable`] on store errors.
    async fn create(&self, user_uuid: &str) -> Result<UserQuota, AppError>;

    /// Finds the record for a user.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StoreUnavailable`] on store errors.
    async fn find(&self, user_uuid: &str) -> Result<Option<UserQuota>, AppError>;

    /// Replaces the record only if its stored version equals `expected_version`.
    ///
    /// # Returns
    ///
    /// - `Ok(true)` if the write was applied
    /// - `Ok(false)` if another writer got there first
    ///
    /// # Errors
    ///
    /// Returns [`AppError::UserNotFound`] if the record no longer exists.
    /// Returns [`AppError::StoreUnavailable`] on store errors.
    async fn compare_and_swap(
        &self,
        updated: &UserQuota,
        expected_version: i64,
    ) -> Result<bool, AppError>;
}
