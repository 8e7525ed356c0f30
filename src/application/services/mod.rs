//! Business logic services for the application layer.

pub mod analytics_service;
pub mod auth_service;
pub mod link_service;
pub mod ownership;
pub mod quota_enforcer;
pub mod rate_limiter;
pub mod user_service;

pub use analytics_service::AnalyticsService;
pub use auth_service::AuthService;
pub use link_service::LinkService;
pub use ownership::OwnershipVerifier;
pub use quota_enforcer::QuotaEnforcer;
pub use rate_limiter::RateLimiter;
pub use user_service::UserService;
