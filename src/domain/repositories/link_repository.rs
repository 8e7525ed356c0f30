//! Repository trait for short-code entries.

use crate::domain::entities::{NewShortCodeEntry, ShortCodeEntry};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Repository interface for short-code entries.
///
/// Short-code uniqueness is enforced here with a conditional create; callers
/// never check-then-insert.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryStore`] - in-process implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/store_memory.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Creates an entry if its short code is not taken.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::DuplicateEntry`] if the short code already exists.
    /// Returns [`AppError::StoreUnavailable`] on store errors.
    async fn create(&self, new_entry: NewShortCodeEntry) -> Result<ShortCodeEntry, AppError>;

    /// Finds an entry by its short code.
    async fn find_by_code(&self, short_code: &str) -> Result<Option<ShortCodeEntry>, AppError>;

    /// Lists entries owned by a user, newest first.
    async fn list_by_owner(&self, user_uuid: &str) -> Result<Vec<ShortCodeEntry>, AppError>;

    /// Counts entries owned by a user.
    async fn count_by_owner(&self, user_uuid: &str) -> Result<i64, AppError>;

    /// Replaces the target URL of an existing entry.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::EntryNotFound`] if no entry has this short code.
    /// Returns [`AppError::StoreUnavailable`] on store errors.
    async fn update_full_url(
        &self,
        short_code: &str,
        full_url: &str,
    ) -> Result<ShortCodeEntry, AppError>;

    /// Deletes an entry. Deleting an absent entry is not an error.
    async fn delete(&self, short_code: &str) -> Result<(), AppError>;

    /// Lists entries whose expiry is at or before `now`.
    async fn list_expired(&self, now: DateTime<Utc>) -> Result<Vec<ShortCodeEntry>, AppError>;

    /// Checks that the store is reachable.
    async fn ping(&self) -> Result<(), AppError>;
}
