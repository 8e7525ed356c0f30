//! Ownership verification for mutating operations.

use std::sync::Arc;

use tracing::warn;

use crate::domain::Principal;
use crate::domain::entities::ShortCodeEntry;
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

/// Confirms the caller owns a short code before it is read in detail,
/// modified or deleted.
///
/// A missing entry and a foreign entry fail with different error kinds.
pub struct OwnershipVerifier {
    links: Arc<dyn LinkRepository>,
}

impl OwnershipVerifier {
    pub fn new(links: Arc<dyn LinkRepository>) -> Self {
        Self { links }
    }

    /// Returns the entry if the caller owns it.
    ///
    /// # Errors
    ///
    /// - [`AppError::EntryNotFound`] if no entry has this short code
    /// - [`AppError::OwnershipCheckFailed`] if another user owns it
    pub async fn verify(
        &self,
        principal: &Principal,
        short_code: &str,
    ) -> Result<ShortCodeEntry, AppError> {
        let entry = self
            .links
            .find_by_code(short_code)
            .await?
            .ok_or_else(|| AppError::entry_not_found(short_code))?;

        if !entry.is_owned_by(principal.user_uuid()) {
            warn!(
                user_uuid = principal.user_uuid(),
                short_code, "Ownership check failed"
            );
            return Err(AppError::OwnershipCheckFailed {
                short_code: short_code.to_string(),
            });
        }

        Ok(entry)
    }
}
