//! Handlers for click analytics.

use axum::{
    Extension, Json,
    extract::{Path, State},
};

use crate::api::dto::analytics::AnalyticsResponse;
use crate::domain::Principal;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::code_generator::validate_short_code;

/// Returns click counters for every code the caller owns.
///
/// # Endpoint
///
/// `GET /api/analytics`
pub async fn analytics_list_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<Vec<AnalyticsResponse>>, AppError> {
    let entries = state.link_service.analytics_for_user(&principal).await?;

    Ok(Json(entries.into_iter().map(AnalyticsResponse::from).collect()))
}

/// Returns the click counter for one owned code.
///
/// # Endpoint
///
/// `GET /api/analytics/{shortCode}`
///
/// # Errors
///
/// - 401 if the caller does not own the code
/// - 404 if the code does not exist
pub async fn analytics_handler(
    Path(short_code): Path<String>,
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<AnalyticsResponse>, AppError> {
    validate_short_code(&short_code, state.limits.short_code_length)?;

    let entry = state
        .link_service
        .analytics_for_code(&principal, &short_code)
        .await?;

    Ok(Json(entry.into()))
}
