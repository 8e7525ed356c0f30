//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer.
//!
//! # Modules
//!
//! - [`cache`] - Redirect target cache (Redis and no-op implementations)
//! - [`persistence`] - PostgreSQL and in-memory repository implementations
//! - [`safety`] - URL safety check adapters

pub mod cache;
pub mod persistence;
pub mod safety;
