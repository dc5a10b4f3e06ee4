//! Credential verification.
//!
//! Looks up an account by email and checks the supplied password against
//! the stored Argon2 hash. The two failure modes stay distinct here so the
//! server can log them apart; the web layer renders both as the same
//! "Invalid email or password" message to prevent account enumeration.

use tracing::debug;

use crate::auth::verify_password;
use crate::db::{AccountClaims, AccountRepository, DbPool};
use crate::{EnrolldError, Result};

/// Verify an email/password pair and return the account's identity claims.
///
/// Read-only: never mutates the store and never returns the password hash.
///
/// # Errors
///
/// - `NotFound` when no account matches the email
/// - `InvalidCredential` when the password does not match
pub async fn verify_credentials(
    pool: &DbPool,
    email: &str,
    password: &str,
) -> Result<AccountClaims> {
    let repo = AccountRepository::new(pool);

    let account = repo
        .find_by_email(email)
        .await?
        .ok_or_else(|| {
            debug!("login attempt for unknown email");
            EnrolldError::NotFound(email.to_string())
        })?;

    verify_password(password, &account.password).map_err(|_| {
        debug!(account_id = account.id, "password verification failed");
        EnrolldError::InvalidCredential
    })?;

    Ok(account.claims())
}
