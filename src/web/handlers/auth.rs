//! Authentication handlers.

use axum::{extract::State, Json};
use jsonwebtoken::{encode, EncodingKey, Header};
use std::sync::Arc;
use validator::Validate;

use crate::auth::{consume_reset, request_reset, verify_credentials};
use crate::config::AuthConfig;
use crate::db::{AccountClaims, Database};
use crate::mail::Mailer;
use crate::web::dto::{
    AccountInfo, ApiResponse, ChangePasswordRequest, LoginRequest, LoginResponse, MeResponse,
    MessageResponse, ResetPasswordRequest,
};
use crate::web::error::ApiError;
use crate::web::middleware::{SessionClaims, SessionUser};
use crate::EnrolldError;

/// Uniform reset-request response, sent whether or not the email exists.
const RESET_REQUESTED_MESSAGE: &str = "If the email is registered, a reset link has been sent.";

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database handle.
    pub db: Database,
    /// Outgoing mail collaborator.
    pub mailer: Arc<dyn Mailer>,
    /// Authentication configuration.
    pub auth_config: AuthConfig,
    /// Session signing key.
    pub encoding_key: EncodingKey,
}

impl AppState {
    /// Create a new application state.
    pub fn new(db: Database, mailer: Arc<dyn Mailer>, auth_config: AuthConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(auth_config.jwt_secret.as_bytes());
        Self {
            db,
            mailer,
            auth_config,
            encoding_key,
        }
    }

    /// Session expiry in seconds.
    pub fn session_expiry_secs(&self) -> u64 {
        self.auth_config.session_expiry_days * 86_400
    }

    /// Issue a session token for verified account claims.
    ///
    /// Claims are fixed at issuance; the random key varies the token
    /// content between logins of the same account.
    pub fn issue_session(&self, claims: &AccountClaims) -> Result<String, ApiError> {
        let now = chrono::Utc::now().timestamp() as u64;
        let session = SessionClaims {
            sub: claims.id,
            role: claims.role.as_str().to_string(),
            district: claims.district.clone(),
            random_key: uuid::Uuid::new_v4().to_string(),
            iat: now,
            exp: now + self.session_expiry_secs(),
        };

        encode(&Header::default(), &session, &self.encoding_key).map_err(|e| {
            tracing::error!("Failed to encode session token: {}", e);
            ApiError::internal("Failed to create session")
        })
    }
}

/// POST /api/auth/login - Credential login.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    req.validate().map_err(ApiError::from_validation_errors)?;

    let claims = verify_credentials(state.db.pool(), &req.email, &req.password)
        .await
        .map_err(|e| match e {
            // Unknown email and wrong password render identically to the
            // client; only the server-side log tells them apart.
            EnrolldError::NotFound(_) | EnrolldError::InvalidCredential => {
                ApiError::unauthorized("Invalid email or password")
            }
            other => {
                tracing::error!("login failed: {}", other);
                ApiError::internal("An internal error occurred")
            }
        })?;

    let token = state.issue_session(&claims)?;

    let response = LoginResponse {
        token,
        expires_in: state.session_expiry_secs(),
        account: AccountInfo {
            id: claims.id,
            email: claims.email,
            role: claims.role.to_string(),
            district: claims.district,
            school_id: claims.school_id,
            school_name: claims.school_name,
        },
    };

    Ok(Json(ApiResponse::new(response)))
}

/// POST /api/auth/reset-password - Request a password reset.
///
/// Always answers with the same message so the response cannot be used to
/// probe which emails are registered.
pub async fn reset_password(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    req.validate().map_err(ApiError::from_validation_errors)?;

    request_reset(
        state.db.pool(),
        state.mailer.clone(),
        &state.auth_config,
        &req.email,
    )
    .await
    .map_err(|e| {
        tracing::error!("reset request failed: {}", e);
        ApiError::internal("An internal error occurred")
    })?;

    Ok(Json(MessageResponse::new(RESET_REQUESTED_MESSAGE)))
}

/// PUT /api/auth/change-password - Exchange a reset token for a new password.
pub async fn change_password(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    req.validate().map_err(ApiError::from_validation_errors)?;

    consume_reset(state.db.pool(), &state.auth_config, &req.token, &req.password)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(MessageResponse::new("Password updated successfully")))
}

/// GET /api/auth/me - Get the current session's claims.
pub async fn me(SessionUser(claims): SessionUser) -> Result<Json<ApiResponse<MeResponse>>, ApiError> {
    let response = MeResponse {
        id: claims.sub,
        role: claims.role,
        district: claims.district,
    };

    Ok(Json(ApiResponse::new(response)))
}
