//! Account repository for enrolld.

use super::{Account, DbPool, NewAccount};
use crate::Result;

/// Repository for account operations.
///
/// The credential verifier only reads through this type; the single write
/// path is `update_password_hash`, used by the reset flow.
pub struct AccountRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> AccountRepository<'a> {
    /// Create a new repository instance.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a new account.
    ///
    /// Account provisioning is an administrative operation; the HTTP layer
    /// does not expose it.
    pub async fn create(&self, new_account: &NewAccount) -> Result<Account> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO accounts (email, password, role, district, school_id, school_name, contact_number)
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING id",
        )
        .bind(&new_account.email)
        .bind(&new_account.password)
        .bind(new_account.role.as_str())
        .bind(&new_account.district)
        .bind(new_account.school_id)
        .bind(&new_account.school_name)
        .bind(&new_account.contact_number)
        .fetch_one(self.pool)
        .await?;

        self.find_by_id(id).await?.ok_or_else(|| {
            crate::EnrolldError::Internal("created account not found".to_string())
        })
    }

    /// Find an account by email.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(
            "SELECT id, email, password, role, district, school_id, school_name,
                    contact_number, created_at
             FROM accounts WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        Ok(account)
    }

    /// Find an account by ID.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(
            "SELECT id, email, password, role, district, school_id, school_name,
                    contact_number, created_at
             FROM accounts WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(account)
    }

    /// Replace the password hash of an account.
    pub async fn update_password_hash(&self, id: i64, password_hash: &str) -> Result<()> {
        let result = sqlx::query("UPDATE accounts SET password = $1 WHERE id = $2")
            .bind(password_hash)
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(crate::EnrolldError::NotFound(format!("account {id}")));
        }

        Ok(())
    }
}
