//! In-process store backed by `DashMap`.
//!
//! Every conditional write runs under the shard lock of its key, which gives
//! the same guarantees as the Postgres statements: conditional creates,
//! version-checked quota updates and lost-update-free click counters.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::domain::entities::{
    AnalyticsEntry, NewAnalyticsEntry, NewShortCodeEntry, ShortCodeEntry, UserQuota,
};
use crate::domain::repositories::{AnalyticsRepository, LinkRepository, QuotaRepository};
use crate::error::AppError;

/// Store used when no database is configured, and by the test-suite.
///
/// State lives only as long as the process.
#[derive(Default)]
pub struct InMemoryStore {
    quotas: DashMap<String, UserQuota>,
    links: DashMap<String, ShortCodeEntry>,
    analytics: DashMap<String, AnalyticsEntry>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl QuotaRepository for InMemoryStore {
    async fn create(&self, user_uuid: &str) -> Result<UserQuota, AppError> {
        match self.quotas.entry(user_uuid.to_string()) {
            Entry::Occupied(_) => Err(AppError::duplicate(user_uuid)),
            Entry::Vacant(slot) => Ok(slot.insert(UserQuota::new(user_uuid)).value().clone()),
        }
    }

    async fn find(&self, user_uuid: &str) -> Result<Option<UserQuota>, AppError> {
        Ok(self.quotas.get(user_uuid).map(|q| q.value().clone()))
    }

    async fn compare_and_swap(
        &self,
        updated: &UserQuota,
        expected_version: i64,
    ) -> Result<bool, AppError> {
        let mut current = self
            .quotas
            .get_mut(&updated.user_uuid)
            .ok_or(AppError::UserNotFound)?;

        if current.version != expected_version {
            return Ok(false);
        }

        *current = updated.clone();
        Ok(true)
    }
}

#[async_trait]
impl LinkRepository for InMemoryStore {
    async fn create(&self, new_entry: NewShortCodeEntry) -> Result<ShortCodeEntry, AppError> {
        match self.links.entry(new_entry.short_code.clone()) {
            Entry::Occupied(_) => Err(AppError::duplicate(new_entry.short_code)),
            Entry::Vacant(slot) => Ok(slot.insert(new_entry.into()).value().clone()),
        }
    }

    async fn find_by_code(&self, short_code: &str) -> Result<Option<ShortCodeEntry>, AppError> {
        Ok(self.links.get(short_code).map(|e| e.value().clone()))
    }

    async fn list_by_owner(&self, user_uuid: &str) -> Result<Vec<ShortCodeEntry>, AppError> {
        let mut owned: Vec<ShortCodeEntry> = self
            .links
            .iter()
            .filter(|e| e.is_owned_by(user_uuid))
            .map(|e| e.value().clone())
            .collect();

        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }

    async fn count_by_owner(&self, user_uuid: &str) -> Result<i64, AppError> {
        let count = self
            .links
            .iter()
            .filter(|e| e.is_owned_by(user_uuid))
            .count();

        Ok(count as i64)
    }

    async fn update_full_url(
        &self,
        short_code: &str,
        full_url: &str,
    ) -> Result<ShortCodeEntry, AppError> {
        let mut entry = self
            .links
            .get_mut(short_code)
            .ok_or_else(|| AppError::entry_not_found(short_code))?;

        entry.full_url = full_url.to_string();
        Ok(entry.value().clone())
    }

    async fn delete(&self, short_code: &str) -> Result<(), AppError> {
        self.links.remove(short_code);
        Ok(())
    }

    async fn list_expired(&self, now: DateTime<Utc>) -> Result<Vec<ShortCodeEntry>, AppError> {
        Ok(self
            .links
            .iter()
            .filter(|e| e.is_expired_at(now))
            .map(|e| e.value().clone())
            .collect())
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[async_trait]
impl AnalyticsRepository for InMemoryStore {
    async fn create(&self, new_entry: NewAnalyticsEntry) -> Result<AnalyticsEntry, AppError> {
        match self.analytics.entry(new_entry.short_code.clone()) {
            Entry::Occupied(_) => Err(AppError::duplicate(new_entry.short_code)),
            Entry::Vacant(slot) => Ok(slot.insert(new_entry.into()).value().clone()),
        }
    }

    async fn record_access(&self, short_code: &str, at: DateTime<Utc>) -> Result<bool, AppError> {
        match self.analytics.get_mut(short_code) {
            Some(mut entry) => {
                entry.total_clicks += 1;
                entry.time_stamp_last_accessed = Some(at);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn find_by_code(&self, short_code: &str) -> Result<Option<AnalyticsEntry>, AppError> {
        Ok(self.analytics.get(short_code).map(|e| e.value().clone()))
    }

    async fn list_by_owner(&self, user_uuid: &str) -> Result<Vec<AnalyticsEntry>, AppError> {
        let mut owned: Vec<AnalyticsEntry> = self
            .analytics
            .iter()
            .filter(|e| e.user_uuid == user_uuid)
            .map(|e| e.value().clone())
            .collect();

        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }

    async fn delete(&self, short_code: &str) -> Result<(), AppError> {
        self.analytics.remove(short_code);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn new_link(code: &str, owner: &str, expires_at: DateTime<Utc>) -> NewShortCodeEntry {
        NewShortCodeEntry {
            short_code: code.to_string(),
            full_url: "https://example.com".to_string(),
            user_uuid: owner.to_string(),
            created_at: Utc::now(),
            expires_at,
        }
    }

    #[tokio::test]
    async fn test_quota_cas_rejects_stale_version() {
        let store = InMemoryStore::new();
        let quota = QuotaRepository::create(&store, "user-1").await.unwrap();

        let next = quota.consume(Utc::now(), Duration::minutes(5));
        assert!(store.compare_and_swap(&next, 0).await.unwrap());
        assert!(!store.compare_and_swap(&next, 0).await.unwrap());
    }

    #[tokio::test]
    async fn test_quota_cas_on_missing_record() {
        let store = InMemoryStore::new();
        let result = store.compare_and_swap(&UserQuota::new("ghost"), 0).await;
        assert!(matches!(result, Err(AppError::UserNotFound)));
    }

    #[tokio::test]
    async fn test_quota_create_is_conditional() {
        let store = InMemoryStore::new();
        QuotaRepository::create(&store, "user-1").await.unwrap();

        let again = QuotaRepository::create(&store, "user-1").await;
        assert!(matches!(again, Err(AppError::DuplicateEntry { .. })));
    }

    #[tokio::test]
    async fn test_link_create_never_overwrites() {
        let store = InMemoryStore::new();
        let far = Utc::now() + Duration::days(365);
        LinkRepository::create(&store, new_link("a1b2c3", "user-1", far))
            .await
            .unwrap();

        let second = LinkRepository::create(&store, new_link("a1b2c3", "user-2", far)).await;
        assert!(matches!(second, Err(AppError::DuplicateEntry { .. })));

        let kept = LinkRepository::find_by_code(&store, "a1b2c3")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(kept.user_uuid, "user-1");
    }

    #[tokio::test]
    async fn test_owner_queries_and_expiry() {
        let store = InMemoryStore::new();
        let now = Utc::now();
        let far = now + Duration::days(365);

        LinkRepository::create(&store, new_link("aaaaaa", "user-1", far))
            .await
            .unwrap();
        LinkRepository::create(&store, new_link("bbbbbb", "user-1", now - Duration::hours(1)))
            .await
            .unwrap();
        LinkRepository::create(&store, new_link("cccccc", "user-2", far))
            .await
            .unwrap();

        assert_eq!(store.count_by_owner("user-1").await.unwrap(), 2);
        assert_eq!(
            LinkRepository::list_by_owner(&store, "user-2")
                .await
                .unwrap()
                .len(),
            1
        );

        let expired = store.list_expired(now).await.unwrap();
        assert_eq!(expired.len(), 1);
        assert_eq!(expired[0].short_code, "bbbbbb");
    }

    #[tokio::test]
    async fn test_update_missing_link() {
        let store = InMemoryStore::new();
        let result = store.update_full_url("a1b2c3", "https://example.org").await;
        assert!(matches!(result, Err(AppError::EntryNotFound { .. })));
    }

    #[tokio::test]
    async fn test_record_access_counts_and_stamps() {
        let store = InMemoryStore::new();
        AnalyticsRepository::create(
            &store,
            NewAnalyticsEntry {
                short_code: "a1b2c3".to_string(),
                user_uuid: "user-1".to_string(),
                created_at: Utc::now(),
            },
        )
        .await
        .unwrap();

        let at = Utc::now();
        assert!(store.record_access("a1b2c3", at).await.unwrap());
        assert!(store.record_access("a1b2c3", at).await.unwrap());
        assert!(!store.record_access("ffffff", at).await.unwrap());

        let entry = AnalyticsRepository::find_by_code(&store, "a1b2c3")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(entry.total_clicks, 2);
        assert_eq!(entry.time_stamp_last_accessed, Some(at));
    }

    #[tokio::test]
    async fn test_deletes_are_idempotent() {
        let store = InMemoryStore::new();
        assert!(LinkRepository::delete(&store, "a1b2c3").await.is_ok());
        assert!(AnalyticsRepository::delete(&store, "a1b2c3").await.is_ok());
    }
}
