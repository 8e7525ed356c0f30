//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};

use crate::error::AppError;
use crate::state::AppState;
use crate::utils::code_generator::validate_short_code;

/// Redirects a short code to its target URL.
///
/// # Endpoint
///
/// `GET /{shortCode}`
///
/// # Request Flow
///
/// 1. Reject malformed codes as not found
/// 2. Resolve the target (cache first, then store)
/// 3. Count the click atomically
/// 4. Return 302 Found with `Location`
///
/// Public: no bearer token. Abuse is bounded by the per-IP limiter on
/// this route.
///
/// # Errors
///
/// Returns 404 Not Found if the code does not exist.
pub async fn redirect_handler(
    Path(short_code): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    if validate_short_code(&short_code, state.limits.short_code_length).is_err() {
        return Err(AppError::entry_not_found(short_code));
    }

    let full_url = state.link_service.redirect(&short_code).await?;

    Ok((StatusCode::FOUND, [(header::LOCATION, full_url)]))
}
