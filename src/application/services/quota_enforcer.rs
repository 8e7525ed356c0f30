//! Cap on the number of short codes a user may own.

use std::sync::Arc;

use tracing::info;

use crate::domain::Principal;
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

/// Rejects resource creation once the caller owns `max_links_per_user` codes.
///
/// The count is a plain read, not transactional with the create that
/// follows, so concurrent shortens from one user can overshoot the cap.
pub struct QuotaEnforcer {
    links: Arc<dyn LinkRepository>,
    max_links_per_user: i64,
}

impl QuotaEnforcer {
    pub fn new(links: Arc<dyn LinkRepository>, max_links_per_user: i64) -> Self {
        Self {
            links,
            max_links_per_user,
        }
    }

    /// # Errors
    ///
    /// Returns [`AppError::TooManyResources`] if the caller is at or above the cap.
    /// Returns [`AppError::StoreUnavailable`] on store errors.
    pub async fn check_quota(&self, principal: &Principal) -> Result<(), AppError> {
        let owned = self.links.count_by_owner(principal.user_uuid()).await?;

        if owned >= self.max_links_per_user {
            info!(user_uuid = principal.user_uuid(), owned, "Resource quota reached");
            return Err(AppError::TooManyResources {
                limit: self.max_links_per_user,
            });
        }

        Ok(())
    }
}
