//! Password reset flow.
//!
//! `request_reset` issues a single-use token and emails it as a link;
//! `consume_reset` exchanges the token for a new password. The token that
//! is emailed is exactly the token that is persisted and later matched.

use std::sync::Arc;

use tracing::{debug, warn};
use url::Url;
use uuid::Uuid;

use crate::auth::{hash_password, validate_password};
use crate::config::AuthConfig;
use crate::db::{AccountRepository, DbPool, NewResetToken, ResetTokenRepository};
use crate::mail::Mailer;
use crate::{EnrolldError, Result};

/// Generate an opaque reset token.
///
/// Two concatenated v4 UUIDs in simple form: 64 hex characters, 256 bits
/// of randomness.
pub fn generate_reset_token() -> String {
    format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
}

/// Build the reset link embedded in the email.
fn reset_link(base_url: &str, token: &str) -> Result<String> {
    let url = Url::parse(base_url)
        .and_then(|u| u.join(&format!("/new-password/{token}")))
        .map_err(|e| EnrolldError::Config(format!("invalid public_base_url: {e}")))?;
    Ok(url.to_string())
}

/// Issue a reset token for the given email and dispatch it by mail.
///
/// Returns `Ok(())` whether or not the email is registered: an unknown
/// email creates no token and sends no mail, but the caller must not be
/// able to tell. The send itself runs on a detached task so the response
/// does not wait on the SMTP round-trip; delivery failures are logged,
/// not surfaced.
pub async fn request_reset(
    pool: &DbPool,
    mailer: Arc<dyn Mailer>,
    config: &AuthConfig,
    email: &str,
) -> Result<()> {
    let accounts = AccountRepository::new(pool);

    let Some(account) = accounts.find_by_email(email).await? else {
        debug!("reset requested for unregistered email");
        return Ok(());
    };

    let token = generate_reset_token();
    ResetTokenRepository::new(pool)
        .create(&NewResetToken {
            account_id: account.id,
            token: token.clone(),
        })
        .await?;

    let link = reset_link(&config.public_base_url, &token)?;
    let body = format!(
        "<p>You requested a password reset. Click <a href=\"{link}\">here</a> \
         to reset your password. This link will expire in {} minutes.</p>",
        config.reset_token_expiry_minutes
    );

    let account_id = account.id;
    let to = email.to_string();
    tokio::spawn(async move {
        if let Err(e) = mailer.send(&to, "Password Reset Request", &body).await {
            // Fire-and-forget: the uniform response must not leak delivery state
            warn!(account_id, "reset mail delivery failed: {e}");
        }
    });

    Ok(())
}

/// Exchange a reset token for a new password.
///
/// The token consumption and the password replacement commit in a single
/// transaction; a failure leaves both untouched.
///
/// # Errors
///
/// - `Validation` when the new password violates the length policy
/// - `InvalidOrExpiredToken` when no unconsumed in-window token matches
pub async fn consume_reset(
    pool: &DbPool,
    config: &AuthConfig,
    token: &str,
    new_password: &str,
) -> Result<()> {
    validate_password(new_password).map_err(|e| EnrolldError::Validation(e.to_string()))?;

    // Fresh salt per hash
    let password_hash =
        hash_password(new_password).map_err(|e| EnrolldError::Internal(e.to_string()))?;

    let consumed = ResetTokenRepository::new(pool)
        .consume_and_replace_password(token, &password_hash, config.reset_token_expiry_minutes)
        .await?;

    match consumed {
        Some(account_id) => {
            debug!(account_id, "password replaced via reset token");
            Ok(())
        }
        None => Err(EnrolldError::InvalidOrExpiredToken),
    }
}
