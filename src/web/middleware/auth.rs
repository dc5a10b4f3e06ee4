//! Session token middleware.
//!
//! Sessions are stateless signed tokens. Claims are set once at issuance
//! and are authoritative; nothing downstream re-derives the role from the
//! database.

use axum::{
    body::Body,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap, Request},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::web::error::ApiError;

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "enrolld_session";

/// Session claims structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (account ID).
    pub sub: i64,
    /// Authorization role.
    pub role: String,
    /// District.
    pub district: String,
    /// Random key varying the token content per issuance.
    pub random_key: String,
    /// Issued at timestamp.
    pub iat: u64,
    /// Expiration timestamp.
    pub exp: u64,
}

/// Application state for session verification.
#[derive(Clone)]
pub struct JwtState {
    /// Decoding key for session verification.
    pub decoding_key: DecodingKey,
    /// Validation settings.
    pub validation: Validation,
}

impl JwtState {
    /// Create a new JWT state from a secret key.
    pub fn new(secret: &str) -> Self {
        let decoding_key = DecodingKey::from_secret(secret.as_bytes());
        let mut validation = Validation::default();
        validation.validate_exp = true;

        Self {
            decoding_key,
            validation,
        }
    }
}

/// Extract the session token from a request.
///
/// The Authorization bearer header wins; the session cookie is the
/// fallback for browser page navigation where no header is set.
pub fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    if let Some(token) = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
    {
        return Some(token.to_string());
    }

    CookieJar::from_headers(headers)
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
}

/// Extractor for authenticated sessions.
///
/// Use this extractor to require a valid session for a handler.
#[derive(Debug, Clone)]
pub struct SessionUser(pub SessionClaims);

impl<S> FromRequestParts<S> for SessionUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            let token = extract_session_token(&parts.headers)
                .ok_or_else(|| ApiError::unauthorized("Missing authorization"))?;

            // JwtState is injected by the session middleware
            let jwt_state = parts
                .extensions
                .get::<Arc<JwtState>>()
                .ok_or_else(|| ApiError::internal("Session state not configured"))?;

            let token_data =
                decode::<SessionClaims>(&token, &jwt_state.decoding_key, &jwt_state.validation)
                    .map_err(|e| {
                        tracing::debug!("session validation failed: {}", e);
                        ApiError::unauthorized("Invalid or expired session")
                    })?;

            Ok(SessionUser(token_data.claims))
        })
    }
}

/// Optional session extractor.
///
/// Similar to SessionUser but yields `None` instead of failing.
#[derive(Debug, Clone)]
pub struct OptionalSessionUser(pub Option<SessionClaims>);

impl<S> FromRequestParts<S> for OptionalSessionUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            let token = match extract_session_token(&parts.headers) {
                Some(t) => t,
                None => return Ok(OptionalSessionUser(None)),
            };

            let jwt_state = match parts.extensions.get::<Arc<JwtState>>() {
                Some(s) => s,
                None => return Ok(OptionalSessionUser(None)),
            };

            match decode::<SessionClaims>(&token, &jwt_state.decoding_key, &jwt_state.validation) {
                Ok(token_data) => Ok(OptionalSessionUser(Some(token_data.claims))),
                Err(_) => Ok(OptionalSessionUser(None)),
            }
        })
    }
}

/// Middleware function to inject session state into request extensions.
pub async fn session_state(
    jwt_state: Arc<JwtState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    request.extensions_mut().insert(jwt_state);
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn create_test_token(secret: &str, claims: &SessionClaims) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn test_claims() -> SessionClaims {
        SessionClaims {
            sub: 1,
            role: "user".to_string(),
            district: "Lahore".to_string(),
            random_key: uuid::Uuid::new_v4().to_string(),
            iat: chrono::Utc::now().timestamp() as u64,
            exp: (chrono::Utc::now().timestamp() + 3600) as u64,
        }
    }

    #[test]
    fn test_jwt_state_new() {
        let state = JwtState::new("test-secret");
        assert!(state.validation.validate_exp);
    }

    #[test]
    fn test_create_and_verify_token() {
        let secret = "test-secret";
        let state = JwtState::new(secret);

        let token = create_test_token(secret, &test_claims());

        let decoded =
            decode::<SessionClaims>(&token, &state.decoding_key, &state.validation).unwrap();
        assert_eq!(decoded.claims.sub, 1);
        assert_eq!(decoded.claims.role, "user");
        assert_eq!(decoded.claims.district, "Lahore");
    }

    #[test]
    fn test_expired_token() {
        let secret = "test-secret";
        let state = JwtState::new(secret);

        let mut claims = test_claims();
        claims.iat = (chrono::Utc::now().timestamp() - 7200) as u64;
        claims.exp = (chrono::Utc::now().timestamp() - 3600) as u64;

        let token = create_test_token(secret, &claims);

        let result = decode::<SessionClaims>(&token, &state.decoding_key, &state.validation);
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_secret() {
        let token = create_test_token("secret1", &test_claims());
        let state = JwtState::new("secret2");

        let result = decode::<SessionClaims>(&token, &state.decoding_key, &state.validation);
        assert!(result.is_err());
    }

    #[test]
    fn test_extract_token_from_bearer_header() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc123"));

        assert_eq!(extract_session_token(&headers), Some("abc123".to_string()));
    }

    #[test]
    fn test_extract_token_from_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            axum::http::header::COOKIE,
            HeaderValue::from_static("enrolld_session=tok-from-cookie"),
        );

        assert_eq!(
            extract_session_token(&headers),
            Some("tok-from-cookie".to_string())
        );
    }

    #[test]
    fn test_extract_token_header_wins_over_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer from-header"));
        headers.insert(
            axum::http::header::COOKIE,
            HeaderValue::from_static("enrolld_session=from-cookie"),
        );

        assert_eq!(
            extract_session_token(&headers),
            Some("from-header".to_string())
        );
    }

    #[test]
    fn test_extract_token_absent() {
        let headers = HeaderMap::new();
        assert_eq!(extract_session_token(&headers), None);
    }
}
