//! Core domain entities representing the business data model.
//!
//! # Entity Types
//!
//! - [`UserQuota`] - Per-user request counter for rate limiting
//! - [`ShortCodeEntry`] - A shortened URL and its owner
//! - [`AnalyticsEntry`] - Click counter attached 1:1 to a short code
//!
//! Separate `New*` structs carry the input for conditional creates.

pub mod analytics;
pub mod link;
pub mod user_quota;

pub use analytics::{AnalyticsEntry, NewAnalyticsEntry};
pub use link::{NewShortCodeEntry, ShortCodeEntry};
pub use user_quota::UserQuota;
