//! Handlers for short link management (list, create, update, delete).

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::links::{FullUrlRequest, LinkResponse};
use crate::domain::Principal;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::code_generator::validate_short_code;

/// Lists the caller's short codes, newest first.
///
/// # Endpoint
///
/// `GET /api/urls`
///
/// Not counted against the rate limit.
pub async fn list_links_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<Vec<LinkResponse>>, AppError> {
    let links = state.link_service.list_links(&principal).await?;

    Ok(Json(links.into_iter().map(LinkResponse::from).collect()))
}

/// Creates a short code for a URL.
///
/// # Endpoint
///
/// `POST /api/urls`
///
/// # Request Body
///
/// ```json
/// { "fullURL": "https://example.com/some/long/path" }
/// ```
///
/// # Errors
///
/// - 400 if the body is invalid or the URL is flagged as unsafe
/// - 401 if the caller has no quota record
/// - 403 if the caller already owns the maximum number of codes
/// - 429 if the caller is over the request rate limit
pub async fn shorten_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<FullUrlRequest>,
) -> Result<(StatusCode, Json<LinkResponse>), AppError> {
    payload.validate()?;

    let entry = state
        .link_service
        .shorten(&principal, &payload.full_url)
        .await?;

    Ok((StatusCode::CREATED, Json(entry.into())))
}

/// Points an owned short code at a new URL.
///
/// # Endpoint
///
/// `PATCH /api/urls/{shortCode}`
///
/// # Errors
///
/// - 400 if the code or body is malformed, or the URL is unsafe
/// - 401 if the caller does not own the code
/// - 404 if the code does not exist
pub async fn update_link_handler(
    Path(short_code): Path<String>,
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<FullUrlRequest>,
) -> Result<Json<LinkResponse>, AppError> {
    validate_short_code(&short_code, state.limits.short_code_length)?;
    payload.validate()?;

    let entry = state
        .link_service
        .update(&principal, &short_code, &payload.full_url)
        .await?;

    Ok(Json(entry.into()))
}

/// Deletes an owned short code and its analytics.
///
/// # Endpoint
///
/// `DELETE /api/urls/{shortCode}`
///
/// Returns 204 No Content on success.
pub async fn delete_link_handler(
    Path(short_code): Path<String>,
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<StatusCode, AppError> {
    validate_short_code(&short_code, state.limits.short_code_length)?;

    state.link_service.delete(&principal, &short_code).await?;

    Ok(StatusCode::NO_CONTENT)
}
