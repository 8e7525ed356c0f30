//! Safety checker that never flags a URL.

use async_trait::async_trait;

use crate::domain::safety::UrlSafetyChecker;
use crate::error::AppError;

/// Treats every URL as safe.
///
/// Selected when `SAFE_BROWSING_API_KEY` is unset.
#[derive(Debug, Default)]
pub struct AllowAllChecker;

#[async_trait]
impl UrlSafetyChecker for AllowAllChecker {
    async fn is_unsafe(&self, _url: &str) -> Result<bool, AppError> {
        Ok(false)
    }
}
