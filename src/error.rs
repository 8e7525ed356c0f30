//! Application error type and its HTTP mapping.
//!
//! Every failure kind of the authorization and quota pipeline is its own
//! variant so the boundary layer can map it to a distinct status code.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Machine-readable error payload returned to API clients.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug, Error)]
pub enum AppError {
    /// Missing, malformed or expired bearer credentials.
    #[error("{message}")]
    Unauthenticated { message: String, details: Value },

    /// No identity on the request, or no quota record for it.
    #[error("User not found")]
    UserNotFound,

    #[error("Rate limit of {limit} requests per {window_seconds}s exceeded")]
    RateLimitExceeded { limit: i64, window_seconds: i64 },

    #[error("Resource limit of {limit} short URLs reached")]
    TooManyResources { limit: i64 },

    #[error("Caller does not own short code {short_code}")]
    OwnershipCheckFailed { short_code: String },

    #[error("Short code {short_code} not found")]
    EntryNotFound { short_code: String },

    #[error("URL failed the safety check")]
    UrlSafetyCheckFailed { url: String },

    /// A conditional create found the key already taken.
    #[error("Entry {key} already exists")]
    DuplicateEntry { key: String },

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("{message}")]
    Validation { message: String, details: Value },

    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    pub fn unauthenticated(message: impl Into<String>, details: Value) -> Self {
        Self::Unauthenticated {
            message: message.into(),
            details,
        }
    }

    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    pub fn entry_not_found(short_code: impl Into<String>) -> Self {
        Self::EntryNotFound {
            short_code: short_code.into(),
        }
    }

    pub fn duplicate(key: impl Into<String>) -> Self {
        Self::DuplicateEntry { key: key.into() }
    }

    pub fn store(reason: impl std::fmt::Display) -> Self {
        Self::StoreUnavailable(reason.to_string())
    }

    /// HTTP status for this error kind.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthenticated { .. }
            | AppError::UserNotFound
            | AppError::OwnershipCheckFailed { .. } => StatusCode::UNAUTHORIZED,
            AppError::RateLimitExceeded { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::TooManyResources { .. } => StatusCode::FORBIDDEN,
            AppError::EntryNotFound { .. } => StatusCode::NOT_FOUND,
            AppError::UrlSafetyCheckFailed { .. } | AppError::Validation { .. } => {
                StatusCode::BAD_REQUEST
            }
            AppError::DuplicateEntry { .. }
            | AppError::StoreUnavailable(_)
            | AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable error code string, distinct for every kind.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Unauthenticated { .. } => "unauthenticated",
            AppError::UserNotFound => "user_not_found",
            AppError::RateLimitExceeded { .. } => "rate_limit_exceeded",
            AppError::TooManyResources { .. } => "too_many_resources",
            AppError::OwnershipCheckFailed { .. } => "ownership_check_failed",
            AppError::EntryNotFound { .. } => "not_found",
            AppError::UrlSafetyCheckFailed { .. } => "url_safety_check_failed",
            AppError::DuplicateEntry { .. } => "duplicate_entry",
            AppError::StoreUnavailable(_) => "store_unavailable",
            AppError::Validation { .. } => "validation_error",
            AppError::Internal { .. } => "internal_error",
        }
    }

    /// Builds the client-facing payload. Internal details are not exposed.
    pub fn to_error_info(&self) -> ErrorInfo {
        let (message, details) = match self {
            AppError::Unauthenticated { message, details }
            | AppError::Validation { message, details } => (message.clone(), details.clone()),
            AppError::UserNotFound => ("UnauthorizedException".to_string(), json!({})),
            AppError::OwnershipCheckFailed { short_code } => (
                "UnauthorizedException".to_string(),
                json!({ "shortCode": short_code }),
            ),
            AppError::RateLimitExceeded {
                limit,
                window_seconds,
            } => (
                format!(
                    "You have made too many requests in the last {} minutes. Please try again later",
                    window_seconds / 60
                ),
                json!({ "limit": limit, "windowSeconds": window_seconds }),
            ),
            AppError::TooManyResources { limit } => (
                format!("You have reached the limit of {} short URLs.", limit),
                json!({ "limit": limit }),
            ),
            AppError::EntryNotFound { short_code } => {
                ("Not Found".to_string(), json!({ "shortCode": short_code }))
            }
            AppError::UrlSafetyCheckFailed { url } => {
                ("This URL is not safe".to_string(), json!({ "fullURL": url }))
            }
            AppError::DuplicateEntry { .. }
            | AppError::StoreUnavailable(_)
            | AppError::Internal { .. } => ("Internal server error".to_string(), json!({})),
        };

        ErrorInfo {
            code: self.code(),
            message,
            details,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(error = %self, code = self.code(), "Request failed");
        } else {
            tracing::debug!(error = %self, code = self.code(), "Request rejected");
        }

        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::bad_request("Validation failed", json!({ "reason": errors.to_string() }))
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db) = e.as_database_error()
            && db.is_unique_violation()
        {
            return AppError::duplicate(db.constraint().unwrap_or("unique"));
        }

        AppError::store(e)
    }
}
