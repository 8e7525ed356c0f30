//! Repository trait definitions for the domain layer.
//!
//! These traits are the store contract the core relies on: conditional
//! creates, version-checked updates, atomic counters and owner-index queries.
//! Concrete stores live in `crate::infrastructure::persistence`.
//!
//! # Available Repositories
//!
//! - [`QuotaRepository`] - Per-user request counters
//! - [`LinkRepository`] - Short-code entries
//! - [`AnalyticsRepository`] - Click counters
//!
//! Mock implementations are auto-generated via `mockall` for unit tests.

pub mod analytics_repository;
pub mod link_repository;
pub mod quota_repository;

pub use analytics_repository::AnalyticsRepository;
pub use link_repository::LinkRepository;
pub use quota_repository::QuotaRepository;

#[cfg(test)]
pub use analytics_repository::MockAnalyticsRepository;
#[cfg(test)]
pub use link_repository::MockLinkRepository;
#[cfg(test)]
pub use quota_repository::MockQuotaRepository;
