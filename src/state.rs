//! Shared application state injected into handlers.

use std::sync::Arc;

use crate::application::services::{AuthService, LinkService};
use crate::config::Limits;
use crate::domain::repositories::LinkRepository;
use crate::infrastructure::cache::CacheService;

/// Cheaply clonable handle to the services behind the HTTP layer.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService>,
    pub auth_service: Arc<AuthService>,
    pub cache: Arc<dyn CacheService>,
    /// Used by the health check to probe the store.
    pub links: Arc<dyn LinkRepository>,
    pub limits: Limits,
}
