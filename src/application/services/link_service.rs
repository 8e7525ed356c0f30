//! Short link lifecycle: shorten, redirect, update, delete and reporting.
//!
//! Every operation is a fail-fast pipeline:
//!
//! ```text
//! rate limit -> quota | ownership -> safety (create/update) -> persist -> analytics
//! ```
//!
//! The first failing stage ends the request with its own error kind.

use std::sync::Arc;

use chrono::{DateTime, Months, Utc};
use tokio_retry::RetryIf;
use tokio_retry::strategy::FixedInterval;
use tracing::{debug, error, info, warn};

use crate::application::services::{
    AnalyticsService, OwnershipVerifier, QuotaEnforcer, RateLimiter,
};
use crate::config::Limits;
use crate::domain::Principal;
use crate::domain::entities::{AnalyticsEntry, NewShortCodeEntry, ShortCodeEntry};
use crate::domain::repositories::{AnalyticsRepository, LinkRepository, QuotaRepository};
use crate::domain::safety::UrlSafetyChecker;
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;
use crate::utils::code_generator::generate_code;

/// Service orchestrating the authorization pipeline around short links.
pub struct LinkService {
    links: Arc<dyn LinkRepository>,
    rate_limiter: RateLimiter,
    quota: QuotaEnforcer,
    ownership: OwnershipVerifier,
    analytics: AnalyticsService,
    safety: Arc<dyn UrlSafetyChecker>,
    cache: Arc<dyn CacheService>,
    limits: Limits,
}

impl LinkService {
    pub fn new(
        quotas: Arc<dyn QuotaRepository>,
        links: Arc<dyn LinkRepository>,
        analytics: Arc<dyn AnalyticsRepository>,
        safety: Arc<dyn UrlSafetyChecker>,
        cache: Arc<dyn CacheService>,
        limits: Limits,
    ) -> Self {
        Self {
            rate_limiter: RateLimiter::new(quotas, limits.clone()),
            quota: QuotaEnforcer::new(links.clone(), limits.max_links_per_user),
            ownership: OwnershipVerifier::new(links.clone()),
            analytics: AnalyticsService::new(analytics),
            links,
            safety,
            cache,
            limits,
        }
    }

    /// Creates a short code for `full_url` owned by the caller.
    ///
    /// # Errors
    ///
    /// - [`AppError::UserNotFound`] / [`AppError::RateLimitExceeded`] from the rate limiter
    /// - [`AppError::TooManyResources`] if the caller owns the maximum number of codes
    /// - [`AppError::UrlSafetyCheckFailed`] if the URL is flagged or cannot be checked
    /// - [`AppError::DuplicateEntry`] if every generated code collided
    pub async fn shorten(
        &self,
        principal: &Principal,
        full_url: &str,
    ) -> Result<ShortCodeEntry, AppError> {
        self.rate_limiter.check_and_consume(principal).await?;
        self.quota.check_quota(principal).await?;
        self.ensure_safe(full_url).await?;

        let entry = self.create_with_retry(principal, full_url).await?;

        if let Err(e) = self
            .analytics
            .create_entry(&entry.short_code, &entry.user_uuid, entry.created_at)
            .await
        {
            error!(short_code = %entry.short_code, error = %e, "Analytics creation failed, rolling back short code");
            if let Err(rollback) = self.links.delete(&entry.short_code).await {
                error!(short_code = %entry.short_code, error = %rollback, "Rollback of short code failed");
            }
            return Err(e);
        }

        metrics::counter!("links_created_total").increment(1);
        info!(
            short_code = %entry.short_code,
            user_uuid = %entry.user_uuid,
            "Short code created"
        );

        Ok(entry)
    }

    /// Resolves a short code to its target URL and counts the click.
    ///
    /// Public: no principal and no per-user rate limit.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::EntryNotFound`] if the code does not exist or has
    /// no analytics entry. No click is counted in that case.
    pub async fn redirect(&self, short_code: &str) -> Result<String, AppError> {
        let cached = match self.cache.get_target(short_code).await {
            Ok(target) => target,
            Err(e) => {
                warn!(short_code, error = %e, "Cache lookup failed, falling back to store");
                None
            }
        };

        let full_url = match cached {
            Some(url) => url,
            None => {
                let entry = self
                    .links
                    .find_by_code(short_code)
                    .await?
                    .ok_or_else(|| AppError::entry_not_found(short_code))?;

                self.cache_target(&entry).await;

                entry.full_url
            }
        };

        if let Err(e) = self.analytics.record_access(short_code, Utc::now()).await {
            self.evict_cached(short_code).await;
            return Err(e);
        }

        metrics::counter!("redirects_total").increment(1);
        debug!(short_code, "Redirect resolved");

        Ok(full_url)
    }

    /// Points an owned short code at a new URL.
    ///
    /// # Errors
    ///
    /// - [`AppError::UserNotFound`] / [`AppError::RateLimitExceeded`] from the rate limiter
    /// - [`AppError::EntryNotFound`] / [`AppError::OwnershipCheckFailed`] from the ownership check
    /// - [`AppError::UrlSafetyCheckFailed`] if the new URL is flagged
    pub async fn update(
        &self,
        principal: &Principal,
        short_code: &str,
        full_url: &str,
    ) -> Result<ShortCodeEntry, AppError> {
        self.rate_limiter.check_and_consume(principal).await?;
        self.ownership.verify(principal, short_code).await?;
        self.ensure_safe(full_url).await?;

        let updated = self.links.update_full_url(short_code, full_url).await?;
        self.evict_cached(short_code).await;

        info!(short_code, "Short code updated");
        Ok(updated)
    }

    /// Deletes an owned short code together with its analytics entry.
    ///
    /// The analytics entry goes first, so a partial failure leaves a code
    /// without a counter (redirects report it as not found) and a retried
    /// delete still passes the ownership check.
    ///
    /// # Errors
    ///
    /// Same rate limit and ownership errors as [`Self::update`].
    pub async fn delete(&self, principal: &Principal, short_code: &str) -> Result<(), AppError> {
        self.rate_limiter.check_and_consume(principal).await?;
        self.ownership.verify(principal, short_code).await?;

        self.analytics.delete_entry(short_code).await?;
        self.links.delete(short_code).await?;
        self.evict_cached(short_code).await;

        info!(short_code, "Short code deleted");
        Ok(())
    }

    /// Lists the caller's short codes. Not rate limited.
    pub async fn list_links(&self, principal: &Principal) -> Result<Vec<ShortCodeEntry>, AppError> {
        self.links.list_by_owner(principal.user_uuid()).await
    }

    /// Returns click counters for every code the caller owns.
    pub async fn analytics_for_user(
        &self,
        principal: &Principal,
    ) -> Result<Vec<AnalyticsEntry>, AppError> {
        self.rate_limiter.check_and_consume(principal).await?;
        self.analytics.for_owner(principal.user_uuid()).await
    }

    /// Returns the click counter for one owned code.
    ///
    /// # Errors
    ///
    /// Same rate limit and ownership errors as [`Self::update`].
    pub async fn analytics_for_code(
        &self,
        principal: &Principal,
        short_code: &str,
    ) -> Result<AnalyticsEntry, AppError> {
        self.rate_limiter.check_and_consume(principal).await?;
        self.ownership.verify(principal, short_code).await?;
        self.analytics.for_code(short_code).await
    }

    /// Deletes every entry whose expiry is at or before `now`, with its
    /// analytics entry. Returns the number of entries removed.
    pub async fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize, AppError> {
        let expired = self.links.list_expired(now).await?;

        for entry in &expired {
            self.analytics.delete_entry(&entry.short_code).await?;
            self.links.delete(&entry.short_code).await?;
            self.evict_cached(&entry.short_code).await;
        }

        if !expired.is_empty() {
            info!(count = expired.len(), "Purged expired short codes");
        }

        Ok(expired.len())
    }

    async fn ensure_safe(&self, full_url: &str) -> Result<(), AppError> {
        if self.safety.is_unsafe(full_url).await? {
            warn!(full_url, "URL rejected by safety check");
            return Err(AppError::UrlSafetyCheckFailed {
                url: full_url.to_string(),
            });
        }
        Ok(())
    }

    /// Generates codes until a conditional create succeeds or the attempt
    /// budget is spent. Only collisions are retried.
    async fn create_with_retry(
        &self,
        principal: &Principal,
        full_url: &str,
    ) -> Result<ShortCodeEntry, AppError> {
        let links = &self.links;
        let user_uuid = principal.user_uuid();
        let length = self.limits.short_code_length;
        let ttl_months = self.limits.link_ttl_months;

        let retries = FixedInterval::from_millis(0)
            .take(self.limits.short_code_max_attempts.saturating_sub(1));

        RetryIf::spawn(
            retries,
            move || {
                let created_at = Utc::now();
                links.create(NewShortCodeEntry {
                    short_code: generate_code(full_url, length),
                    full_url: full_url.to_string(),
                    user_uuid: user_uuid.to_string(),
                    created_at,
                    expires_at: expiry_for(created_at, ttl_months),
                })
            },
            |e: &AppError| match e {
                AppError::DuplicateEntry { key } => {
                    warn!(short_code = %key, "Short code collision, regenerating");
                    metrics::counter!("short_code_collisions_total").increment(1);
                    true
                }
                _ => false,
            },
        )
        .await
    }

    /// Caches a target read from the store, then re-reads the entry and
    /// evicts when an update or delete has replaced it in the meantime.
    ///
    /// Updates write the store before evicting, so either the re-read sees
    /// the new target or the update's eviction lands after this write.
    async fn cache_target(&self, entry: &ShortCodeEntry) {
        let short_code = entry.short_code.as_str();

        if let Err(e) = self.cache.put_target(short_code, &entry.full_url).await {
            warn!(short_code, error = %e, "Failed to cache redirect target");
            return;
        }

        match self.links.find_by_code(short_code).await {
            Ok(Some(current)) if current.full_url == entry.full_url => {}
            Ok(_) => {
                debug!(short_code, "Target changed while caching, evicting");
                self.evict_cached(short_code).await;
            }
            Err(e) => {
                warn!(short_code, error = %e, "Could not confirm cached target, evicting");
                self.evict_cached(short_code).await;
            }
        }
    }

    async fn evict_cached(&self, short_code: &str) {
        if let Err(e) = self.cache.evict(short_code).await {
            warn!(short_code, error = %e, "Failed to evict cached target");
        }
    }
}

fn expiry_for(created_at: DateTime<Utc>, ttl_months: u32) -> DateTime<Utc> {
    created_at
        .checked_add_months(Months::new(ttl_months))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
