//! Per-IP token bucket for public endpoints.
//!
//! Per-user request quotas are enforced by
//! [`crate::application::services::RateLimiter`]; this layer only protects
//! the unauthenticated redirect route.

use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer, governor::GovernorConfigBuilder, key_extractor::PeerIpKeyExtractor,
};

/// Creates a rate limiter for public endpoints.
///
/// # Limits
///
/// - **Replenish**: one request every 2 seconds
/// - **Burst**: 100 requests
///
/// Requests exceeding the limit receive `429 Too Many Requests`.
///
/// Keys are client IPs taken from the socket peer address, so the server must
/// be started with `into_make_service_with_connect_info::<SocketAddr>()`.
pub fn layer() -> GovernorLayer<PeerIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>
{
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(2)
            .burst_size(100)
            .finish()
            .expect("non-zero period and burst size"),
    );

    GovernorLayer::new(governor_conf)
}
