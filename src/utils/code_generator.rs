//! Short code generation and validation utilities.
//!
//! Codes are a random window into the SHA-256 hex digest of the target URL
//! concatenated with the current time. Uniqueness is never assumed here: the
//! store's conditional create is the source of truth and callers retry on
//! collision.

use crate::error::AppError;
use chrono::{DateTime, SecondsFormat, Utc};
use rand::Rng;
use regex::Regex;
use serde_json::json;
use sha2::{Digest, Sha256};
use std::sync::LazyLock;

/// Length of a hex-encoded SHA-256 digest.
const DIGEST_HEX_LEN: usize = 64;

static SHORT_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9a-f]+$").expect("valid short code regex"));

/// Generates a candidate short code for `url` at the current instant.
///
/// # Examples
///
/// ```ignore
/// let code = generate_code("https://example.com", 6);
/// assert_eq!(code.len(), 6);
/// assert!(code.chars().all(|c| c.is_ascii_hexdigit()));
/// ```
pub fn generate_code(url: &str, length: usize) -> String {
    generate_code_at(url, Utc::now(), length, &mut rand::rng())
}

/// Deterministic core of [`generate_code`] with injectable time and randomness.
///
/// `length` is clamped to the digest length.
pub fn generate_code_at<R: Rng + ?Sized>(
    url: &str,
    at: DateTime<Utc>,
    length: usize,
    rng: &mut R,
) -> String {
    let length = length.min(DIGEST_HEX_LEN);

    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    hasher.update(at.to_rfc3339_opts(SecondsFormat::Millis, true).as_bytes());
    let digest = hex::encode(hasher.finalize());

    let start = rng.random_range(0..=digest.len() - length);
    digest[start..start + length].to_string()
}

/// Checks that a path segment is a well-formed short code.
///
/// # Errors
///
/// Returns [`AppError::Validation`] if the code has the wrong length or
/// contains anything but lowercase hex digits.
pub fn validate_short_code(code: &str, length: usize) -> Result<(), AppError> {
    if code.len() != length {
        return Err(AppError::bad_request(
            format!("Short code must be {} characters", length),
            json!({ "provided_length": code.len() }),
        ));
    }

    if !SHORT_CODE_RE.is_match(code) {
        return Err(AppError::bad_request(
            "Short code may only contain lowercase hex digits",
            json!({ "shortCode": code }),
        ));
    }

    Ok(())
}
