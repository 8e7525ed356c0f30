//! DTOs for the short link endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::domain::entities::ShortCodeEntry;

/// Request body for `POST /api/urls` and `PATCH /api/urls/{shortCode}`.
#[derive(Debug, Deserialize, Validate)]
pub struct FullUrlRequest {
    /// Target URL (absolute HTTP/HTTPS).
    #[serde(rename = "fullURL")]
    #[validate(
        length(max = 2048, message = "URL must be at most 2048 characters"),
        url(message = "Invalid URL format"),
        custom(function = "validate_http_scheme")
    )]
    pub full_url: String,
}

fn validate_http_scheme(value: &str) -> Result<(), ValidationError> {
    match url::Url::parse(value) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(()),
        _ => Err(ValidationError::new("scheme")
            .with_message("URL must use http or https".into())),
    }
}

/// A short code as returned to its owner.
#[derive(Debug, Serialize)]
pub struct LinkResponse {
    #[serde(rename = "shortCode")]
    pub short_code: String,
    #[serde(rename = "fullURL")]
    pub full_url: String,
    #[serde(rename = "userUUID")]
    pub user_uuid: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "expiresAt")]
    pub expires_at: DateTime<Utc>,
}

impl From<ShortCodeEntry> for LinkResponse {
    fn from(entry: ShortCodeEntry) -> Self {
        Self {
            short_code: entry.short_code,
            full_url: entry.full_url,
            user_uuid: entry.user_uuid,
            created_at: entry.created_at,
            expires_at: entry.expires_at,
        }
    }
}
