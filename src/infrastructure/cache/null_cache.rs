//! No-op cache implementation for disabled caching.

use super::service::{CacheResult, CacheService};
use async_trait::async_trait;
use tracing::debug;

/// A cache that never stores anything.
///
/// Used when Redis is not configured, when it is unreachable at start-up,
/// and in tests.
pub struct NullCache;

impl NullCache {
    pub fn new() -> Self {
        debug!("Using NullCache (caching disabled)");
        Self
    }
}

impl Default for NullCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheService for NullCache {
    async fn get_target(&self, _short_code: &str) -> CacheResult<Option<String>> {
        Ok(None)
    }

    async fn put_target(&self, _short_code: &str, _full_url: &str) -> CacheResult<()> {
        Ok(())
    }

    async fn evict(&self, _short_code: &str) -> CacheResult<()> {
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }
}
