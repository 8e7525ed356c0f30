//! Bearer token authentication middleware.

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::Response,
};
use axum_auth::AuthBearer;

use crate::{error::AppError, state::AppState};

/// Authenticates requests and attaches the caller's [`crate::domain::Principal`].
///
/// # Header Format
///
/// ```text
/// Authorization: Bearer <jwt>
/// ```
///
/// # Authentication Flow
///
/// 1. Extract token from `Authorization` header
/// 2. Verify signature and expiry
/// 3. Insert the principal into request extensions
/// 4. Continue to next middleware/handler
///
/// Handlers read the identity with `Extension<Principal>`; nothing below
/// this layer looks at the raw token.
///
/// # Errors
///
/// Returns `401 Unauthorized` if the header is missing, the token is invalid
/// or expired, or it carries no user identity.
///
/// # Example
///
/// ```rust,ignore
/// let protected = Router::new()
///     .route("/api/urls", get(list_links_handler))
///     .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));
/// ```
pub async fn layer(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let AuthBearer(token) = AuthBearer::from_request_parts(&mut parts, &())
        .await
        .map_err(|_| {
            AppError::unauthenticated(
                "Unauthorized",
                serde_json::json!({"reason": "Authorization header is missing or invalid"}),
            )
        })?;

    let principal = st.auth_service.authenticate(&token)?;
    parts.extensions.insert(principal);

    Ok(next.run(Request::from_parts(parts, body)).await)
}
