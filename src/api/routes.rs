//! API route configuration.
//!
//! All API endpoints require Bearer token authentication via
//! [`crate::api::middleware::auth`].

use crate::api::handlers::{
    analytics_handler, analytics_list_handler, delete_link_handler, list_links_handler,
    shorten_handler, update_link_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, patch},
};

/// All API routes, protected by Bearer token authentication.
///
/// # Endpoints
///
/// - `GET    /urls`                    - List the caller's short codes
/// - `POST   /urls`                    - Create a short code
/// - `PATCH  /urls/{shortCode}`        - Change the target URL
/// - `DELETE /urls/{shortCode}`        - Delete a short code and its analytics
/// - `GET    /analytics`               - Click counters for all owned codes
/// - `GET    /analytics/{shortCode}`   - Click counter for one owned code
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/urls", get(list_links_handler).post(shorten_handler))
        .route(
            "/urls/{short_code}",
            patch(update_link_handler).delete(delete_link_handler),
        )
        .route("/analytics", get(analytics_list_handler))
        .route("/analytics/{short_code}", get(analytics_handler))
}
