//! Per-user trailing-window rate limiter.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::config::Limits;
use crate::domain::Principal;
use crate::domain::entities::UserQuota;
use crate::domain::repositories::QuotaRepository;
use crate::error::AppError;

/// Upper bound on compare-and-swap rounds before giving up on a hot record.
const MAX_CAS_ATTEMPTS: usize = 16;

/// Enforces `max_requests_per_window` requests per user per trailing window.
///
/// The read-modify-write on the quota record is a compare-and-swap loop on
/// the record version, so concurrent requests for the same user never
/// overwrite each other's increments.
pub struct RateLimiter {
    quotas: Arc<dyn QuotaRepository>,
    limits: Limits,
}

impl RateLimiter {
    pub fn new(quotas: Arc<dyn QuotaRepository>, limits: Limits) -> Self {
        Self { quotas, limits }
    }

    /// Counts one request for the caller against the current window.
    ///
    /// # Errors
    ///
    /// See [`Self::check_and_consume_at`].
    pub async fn check_and_consume(&self, principal: &Principal) -> Result<UserQuota, AppError> {
        self.check_and_consume_at(principal, Utc::now()).await
    }

    /// Counts one request at `now` and returns the persisted record.
    ///
    /// A rejected request is still persisted, so it counts against the window.
    ///
    /// # Errors
    ///
    /// - [`AppError::UserNotFound`] if the caller has no quota record
    /// - [`AppError::RateLimitExceeded`] if the updated counter exceeds the limit
    /// - [`AppError::StoreUnavailable`] on store errors or persistent contention
    pub async fn check_and_consume_at(
        &self,
        principal: &Principal,
        now: DateTime<Utc>,
    ) -> Result<UserQuota, AppError> {
        let user_uuid = principal.user_uuid();

        for attempt in 1..=MAX_CAS_ATTEMPTS {
            let current = self
                .quotas
                .find(user_uuid)
                .await?
                .ok_or(AppError::UserNotFound)?;

            let next = current.consume(now, self.limits.rate_limit_window);

            if !self.quotas.compare_and_swap(&next, current.version).await? {
                debug!(user_uuid, attempt, "Quota record changed concurrently, retrying");
                continue;
            }

            if next.requests_in_window > self.limits.max_requests_per_window {
                warn!(
                    user_uuid,
                    requests = next.requests_in_window,
                    "Rate limit exceeded"
                );
                metrics::counter!("rate_limited_requests_total").increment(1);
                return Err(AppError::RateLimitExceeded {
                    limit: self.limits.max_requests_per_window,
                    window_seconds: self.limits.rate_limit_window.num_seconds(),
                });
            }

            return Ok(next);
        }

        Err(AppError::store(format!(
            "quota record for {} stayed contended after {} attempts",
            user_uuid, MAX_CAS_ATTEMPTS
        )))
    }
}
