//! Port for the external URL safety check.

use crate::error::AppError;
use async_trait::async_trait;

/// Decides whether a target URL may be shortened.
///
/// Consulted before any store write on create and update.
///
/// # Implementations
///
/// - [`crate::infrastructure::safety::SafeBrowsingChecker`] - Google Safe Browsing lookup
/// - [`crate::infrastructure::safety::AllowAllChecker`] - accepts everything
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlSafetyChecker: Send + Sync {
    /// Returns `Ok(true)` if the URL is flagged as unsafe.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::UrlSafetyCheckFailed`] if the lookup itself fails.
    async fn is_unsafe(&self, url: &str) -> Result<bool, AppError>;
}
