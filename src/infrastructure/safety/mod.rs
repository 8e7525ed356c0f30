//! URL safety check adapters.
//!
//! - [`SafeBrowsingChecker`] - Google Safe Browsing v4 lookups
//! - [`AllowAllChecker`] - accepts every URL when no API key is configured

mod allow_all;
mod safe_browsing;

pub use allow_all::AllowAllChecker;
pub use safe_browsing::SafeBrowsingChecker;
