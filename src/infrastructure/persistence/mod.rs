//! Store implementations of the domain repository traits.
//!
//! # Backends
//!
//! - PostgreSQL ([`PgQuotaRepository`], [`PgLinkRepository`], [`PgAnalyticsRepository`])
//!   using SQLx runtime queries against the schema in `migrations/`
//! - [`InMemoryStore`] - a single `DashMap`-backed store implementing all three traits
//!
//! [`Repositories`] bundles one backend's trait objects for wiring.

pub mod memory;
pub mod pg_analytics_repository;
pub mod pg_link_repository;
pub mod pg_quota_repository;

pub use memory::InMemoryStore;
pub use pg_analytics_repository::PgAnalyticsRepository;
pub use pg_link_repository::PgLinkRepository;
pub use pg_quota_repository::PgQuotaRepository;

use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::repositories::{AnalyticsRepository, LinkRepository, QuotaRepository};

/// The three repositories of one store backend.
#[derive(Clone)]
pub struct Repositories {
    pub quotas: Arc<dyn QuotaRepository>,
    pub links: Arc<dyn LinkRepository>,
    pub analytics: Arc<dyn AnalyticsRepository>,
}

impl Repositories {
    pub fn postgres(pool: Arc<PgPool>) -> Self {
        Self {
            quotas: Arc::new(PgQuotaRepository::new(pool.clone())),
            links: Arc::new(PgLinkRepository::new(pool.clone())),
            analytics: Arc::new(PgAnalyticsRepository::new(pool)),
        }
    }

    pub fn in_memory() -> Self {
        Self::from_store(Arc::new(InMemoryStore::new()))
    }

    /// Shares one in-memory store across all three roles.
    pub fn from_store(store: Arc<InMemoryStore>) -> Self {
        Self {
            quotas: store.clone(),
            links: store.clone(),
            analytics: store,
        }
    }
}
