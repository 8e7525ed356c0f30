//! Domain layer containing business entities and ports.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Store contract as repository traits
//! - [`principal`] - The authenticated caller
//! - [`safety`] - External URL safety check port
//!
//! The domain layer has no dependencies on infrastructure or presentation
//! layers. Business rules live in [`crate::application::services`].

pub mod entities;
pub mod principal;
pub mod repositories;
pub mod safety;

pub use principal::Principal;
