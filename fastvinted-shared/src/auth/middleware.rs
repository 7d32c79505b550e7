/// Request authentication
///
/// Two independent capability checks, one per trust boundary:
///
/// - **Bearer tokens** identify an end user. [`authenticate_bearer`] reads
///   `Authorization: Bearer <jwt>` and yields an [`AuthContext`].
/// - **The integration key** identifies the trusted scraper job.
///   [`authenticate_integration`] reads `x-api-key` and yields an
///   [`IntegrationCaller`], which carries no user identity at all.
///
/// The API server wraps each in an axum middleware layer and inserts the
/// result into request extensions:
///
/// ```
/// use axum::Extension;
/// use fastvinted_shared::auth::middleware::AuthContext;
///
/// async fn handler(Extension(auth): Extension<AuthContext>) -> String {
///     format!("User: {}", auth.user_id)
/// }
/// ```

use axum::http::{header, HeaderMap};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::api_key::{IntegrationKey, IntegrationKeyError, API_KEY_HEADER};
use super::jwt::{validate_token, JwtError};

/// Identity of the user behind a bearer token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    pub user_id: Uuid,

    pub email: String,
}

/// Marker for requests authenticated with the integration key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntegrationCaller;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Missing credentials")]
    MissingCredentials,

    #[error("{0}")]
    InvalidFormat(String),

    #[error("{0}")]
    InvalidToken(String),

    #[error("{0}")]
    InvalidApiKey(String),
}

/// Validates the bearer token in `headers`
pub fn authenticate_bearer(headers: &HeaderMap, secret: &str) -> Result<AuthContext, AuthError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))?;

    let claims = validate_token(token, secret).map_err(|e| match e {
        JwtError::Expired => AuthError::InvalidToken("Token expired".to_string()),
        JwtError::InvalidIssuer => AuthError::InvalidToken("Invalid token issuer".to_string()),
        _ => AuthError::InvalidToken("Invalid token".to_string()),
    })?;

    Ok(AuthContext {
        user_id: claims.sub,
        email: claims.email,
    })
}

/// Validates the `x-api-key` header in `headers`
pub fn authenticate_integration(
    headers: &HeaderMap,
    key: &IntegrationKey,
) -> Result<IntegrationCaller, AuthError> {
    let presented = headers.get(API_KEY_HEADER).and_then(|v| v.to_str().ok());

    key.verify(presented).map_err(|e| match e {
        IntegrationKeyError::Missing => AuthError::MissingCredentials,
        _ => AuthError::InvalidApiKey("Invalid API key".to_string()),
    })?;

    Ok(IntegrationCaller)
}
