//! Bearer token verification.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::Principal;
use crate::error::AppError;

/// Claims read from identity-provider access tokens.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// The user UUID assigned at sign-up.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub exp: u64,
}

/// Turns bearer tokens into a [`Principal`].
///
/// Tokens are HS256 JWTs issued by the identity provider. Issuance is not
/// handled here; this service only verifies signature and expiry.
pub struct AuthService {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl AuthService {
    pub fn new(jwt_secret: &str) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(jwt_secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    /// Verifies a raw bearer token and extracts the caller's identity.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthenticated`] if the token is malformed, has a
    /// bad signature or has expired.
    /// Returns [`AppError::UserNotFound`] if the token carries no `username`.
    pub fn authenticate(&self, token: &str) -> Result<Principal, AppError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            AppError::unauthenticated(
                "Unauthorized",
                json!({ "reason": format!("Invalid bearer token: {}", e) }),
            )
        })?;

        data.claims
            .username
            .filter(|username| !username.is_empty())
            .map(Principal::new)
            .ok_or(AppError::UserNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use jsonwebtoken::{EncodingKey, Header, encode};

    const SECRET: &str = "test-signing-secret";

    fn token(username: Option<&str>, expires_in: Duration, secret: &str) -> String {
        let claims = Claims {
            username: username.map(str::to_string),
            exp: (Utc::now() + expires_in).timestamp() as u64,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_authenticate_success() {
        let service = AuthService::new(SECRET);
        let principal = service
            .authenticate(&token(Some("user-1"), Duration::hours(1), SECRET))
            .unwrap();

        assert_eq!(principal.user_uuid(), "user-1");
    }

    #[test]
    fn test_authenticate_wrong_secret() {
        let service = AuthService::new(SECRET);
        let result = service.authenticate(&token(Some("user-1"), Duration::hours(1), "other"));

        assert!(matches!(result, Err(AppError::Unauthenticated { .. })));
    }

    #[test]
    fn test_authenticate_expired() {
        let service = AuthService::new(SECRET);
        let result = service.authenticate(&token(Some("user-1"), Duration::hours(-2), SECRET));

        assert!(matches!(result, Err(AppError::Unauthenticated { .. })));
    }

    #[test]
    fn test_authenticate_missing_username() {
        let service = AuthService::new(SECRET);
        let result = service.authenticate(&token(None, Duration::hours(1), SECRET));

        assert!(matches!(result, Err(AppError::UserNotFound)));
    }

    #[test]
    fn test_authenticate_garbage() {
        let service = AuthService::new(SECRET);
        assert!(matches!(
            service.authenticate("not-a-jwt"),
            Err(AppError::Unauthenticated { .. })
        ));
    }
}
