//! Reset token repository for the password-reset flow.
//!
//! Reset tokens are single-use opaque credentials bound to an account.
//! Consumption and the password replacement happen inside one transaction
//! so a crash can never leave a replayable token behind a changed password.

use super::DbPool;
use crate::Result;

const SQL_CONSUME: &str = "UPDATE reset_tokens
     SET consumed_at = datetime('now')
     WHERE token = $1
       AND consumed_at IS NULL
       AND created_at > datetime('now', '-' || $2 || ' minutes')
     RETURNING account_id";

/// Reset token entity.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ResetToken {
    /// Token ID.
    pub id: i64,
    /// Owning account ID.
    pub account_id: i64,
    /// Opaque token string.
    pub token: String,
    /// Creation timestamp.
    pub created_at: String,
    /// Consumption timestamp (None if unconsumed).
    pub consumed_at: Option<String>,
}

impl ResetToken {
    /// Check if the token has been consumed.
    pub fn is_consumed(&self) -> bool {
        self.consumed_at.is_some()
    }
}

/// New reset token for creation.
pub struct NewResetToken {
    /// Owning account ID.
    pub account_id: i64,
    /// Opaque token string.
    pub token: String,
}

/// Repository for reset token operations.
pub struct ResetTokenRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> ResetTokenRepository<'a> {
    /// Create a new repository instance.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Persist a new reset token.
    pub async fn create(&self, new_token: &NewResetToken) -> Result<ResetToken> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO reset_tokens (account_id, token) VALUES ($1, $2) RETURNING id",
        )
        .bind(new_token.account_id)
        .bind(&new_token.token)
        .fetch_one(self.pool)
        .await?;

        self.get_by_id(id).await?.ok_or_else(|| {
            crate::EnrolldError::Internal("created reset token not found".to_string())
        })
    }

    /// Get a reset token by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<ResetToken>> {
        let token = sqlx::query_as::<_, ResetToken>(
            "SELECT id, account_id, token, created_at, consumed_at
             FROM reset_tokens WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(token)
    }

    /// Get a reset token by its token string.
    pub async fn get_by_token(&self, token: &str) -> Result<Option<ResetToken>> {
        let token = sqlx::query_as::<_, ResetToken>(
            "SELECT id, account_id, token, created_at, consumed_at
             FROM reset_tokens WHERE token = $1",
        )
        .bind(token)
        .fetch_optional(self.pool)
        .await?;

        Ok(token)
    }

    /// Count tokens belonging to an account.
    pub async fn count_for_account(&self, account_id: i64) -> Result<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM reset_tokens WHERE account_id = $1")
                .bind(account_id)
                .fetch_one(self.pool)
                .await?;

        Ok(count)
    }

    /// Atomically consume an unconsumed, unexpired token and replace the
    /// owning account's password hash.
    ///
    /// Both writes commit together or not at all. Returns the owning
    /// account ID if the token was valid, `None` if no usable token
    /// matched (unknown, already consumed, or past the validity window).
    pub async fn consume_and_replace_password(
        &self,
        token: &str,
        password_hash: &str,
        window_minutes: u32,
    ) -> Result<Option<i64>> {
        let mut tx = self.pool.begin().await?;

        // UPDATE ... RETURNING marks the token consumed and yields the owner
        // in one statement, so concurrent consumers cannot both match.
        let account_id: Option<i64> = sqlx::query_scalar(SQL_CONSUME)
            .bind(token)
            .bind(i64::from(window_minutes))
            .fetch_optional(&mut *tx)
            .await?;

        let Some(account_id) = account_id else {
            // Dropping the transaction rolls back the no-op.
            return Ok(None);
        };

        sqlx::query("UPDATE accounts SET password = $1 WHERE id = $2")
            .bind(password_hash)
            .bind(account_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(Some(account_id))
    }
}
