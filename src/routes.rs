//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{shortCode}` - Short link redirect (public, per-IP limited)
//! - `GET  /health`      - Health check: store and cache (public)
//! - `/api/*`            - REST API (Bearer token required)
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket on the redirect route
//! - **Authentication** - Bearer JWT on the API
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::{auth, rate_limit, tracing};
use crate::state::AppState;
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Builds the router without path normalization.
///
/// `ip_rate_limit` toggles the per-IP limiter on the redirect route. The
/// limiter needs `ConnectInfo<SocketAddr>`, which in-process test clients
/// do not provide.
pub fn build_router(state: AppState, ip_rate_limit: bool) -> Router {
    let api_router = api::routes::protected_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));

    let mut redirect_router = Router::new().route("/{short_code}", get(redirect_handler));
    if ip_rate_limit {
        redirect_router = redirect_router.layer(rate_limit::layer());
    }

    Router::new()
        .merge(redirect_router)
        .route("/health", get(health_handler))
        .nest("/api", api_router)
        .with_state(state)
        .layer(tracing::layer())
}

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(build_router(state, true))
}
