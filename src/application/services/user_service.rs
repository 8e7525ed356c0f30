//! Quota record lifecycle for confirmed accounts.

use std::sync::Arc;

use tracing::info;

use crate::domain::entities::UserQuota;
use crate::domain::repositories::QuotaRepository;
use crate::error::AppError;

/// Creates and reads per-user quota records.
///
/// Registration happens once, when the identity provider confirms an
/// account. Without a record every rate-limited operation fails with
/// [`AppError::UserNotFound`].
pub struct UserService {
    quotas: Arc<dyn QuotaRepository>,
}

impl UserService {
    pub fn new(quotas: Arc<dyn QuotaRepository>) -> Self {
        Self { quotas }
    }

    /// Creates a zeroed quota record.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::DuplicateEntry`] if the user is already registered.
    pub async fn register(&self, user_uuid: &str) -> Result<UserQuota, AppError> {
        let user_uuid = user_uuid.trim();
        if user_uuid.is_empty() {
            return Err(AppError::bad_request(
                "User UUID must not be empty",
                serde_json::json!({}),
            ));
        }

        let quota = self.quotas.create(user_uuid).await?;
        info!(user_uuid, "Quota record created");
        Ok(quota)
    }

    /// # Errors
    ///
    /// Returns [`AppError::UserNotFound`] if no record exists.
    pub async fn get(&self, user_uuid: &str) -> Result<UserQuota, AppError> {
        self.quotas
            .find(user_uuid)
            .await?
            .ok_or(AppError::UserNotFound)
    }
}
