//! Application layer services implementing business logic.
//!
//! This layer orchestrates domain operations by coordinating repository calls,
//! validation, and business rules. Services consume repository traits and provide
//! a clean API for HTTP handlers.
//!
//! # Available Services
//!
//! - [`services::rate_limiter::RateLimiter`] - Fixed-window request limit per user
//! - [`services::quota_enforcer::QuotaEnforcer`] - Cap on owned short codes
//! - [`services::ownership::OwnershipVerifier`] - Owner check before mutation or reads
//! - [`services::analytics_service::AnalyticsService`] - Click counters
//! - [`services::link_service::LinkService`] - Short link lifecycle, composing the above
//! - [`services::auth_service::AuthService`] - Bearer JWT validation
//! - [`services::user_service::UserService`] - Quota record registration

pub mod services;
