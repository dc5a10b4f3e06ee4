//! Account model for enrolld.
//!
//! This module defines the Account struct and Role enum. Accounts are
//! provisioned out of band; this service reads them for credential
//! verification and replaces the password hash in the reset flow.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Authorization role for route access.
///
/// A closed enumeration: the role-to-route mapping in the gate is a total
/// match over this type, so no role can fall outside the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Contest administrator.
    Admin,
    /// Registered school account.
    User,
}

impl Role {
    /// Convert role to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "user" => Ok(Role::User),
            _ => Err(format!("unknown role: {s}")),
        }
    }
}

impl TryFrom<String> for Role {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Account entity representing a school or an administrator.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Account {
    /// Unique account ID.
    pub id: i64,
    /// Login email (unique).
    pub email: String,
    /// Password hash (Argon2).
    pub password: String,
    /// Authorization role.
    #[sqlx(try_from = "String")]
    pub role: Role,
    /// District the account belongs to.
    pub district: String,
    /// School ID (User-role accounts only).
    pub school_id: Option<i64>,
    /// School name (User-role accounts only).
    pub school_name: Option<String>,
    /// Contact phone number (optional).
    pub contact_number: Option<String>,
    /// Account creation timestamp.
    pub created_at: String,
}

impl Account {
    /// Extract the identity claims of this account.
    ///
    /// The password hash never leaves the repository layer through this path.
    pub fn claims(&self) -> AccountClaims {
        AccountClaims {
            id: self.id,
            email: self.email.clone(),
            role: self.role,
            district: self.district.clone(),
            school_id: self.school_id,
            school_name: self.school_name.clone(),
        }
    }
}

/// Identity claims extracted from a verified account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountClaims {
    /// Account ID.
    pub id: i64,
    /// Login email.
    pub email: String,
    /// Authorization role.
    pub role: Role,
    /// District.
    pub district: String,
    /// School ID (User-role accounts only).
    pub school_id: Option<i64>,
    /// School name (User-role accounts only).
    pub school_name: Option<String>,
}

/// Data for creating a new account.
#[derive(Debug, Clone)]
pub struct NewAccount {
    /// Login email.
    pub email: String,
    /// Password hash (should be pre-hashed with Argon2).
    pub password: String,
    /// Authorization role (defaults to User).
    pub role: Role,
    /// District.
    pub district: String,
    /// School ID (optional).
    pub school_id: Option<i64>,
    /// School name (optional).
    pub school_name: Option<String>,
    /// Contact phone number (optional).
    pub contact_number: Option<String>,
}

impl NewAccount {
    /// Create a new account with minimal required fields.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            role: Role::User,
            district: String::new(),
            school_id: None,
            school_name: None,
            contact_number: None,
        }
    }

    /// Set the role.
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    /// Set the district.
    pub fn with_district(mut self, district: impl Into<String>) -> Self {
        self.district = district.into();
        self
    }

    /// Set the school linkage.
    pub fn with_school(mut self, school_id: i64, school_name: impl Into<String>) -> Self {
        self.school_id = Some(school_id);
        self.school_name = Some(school_name.into());
        self
    }

    /// Set the contact number.
    pub fn with_contact_number(mut self, contact_number: impl Into<String>) -> Self {
        self.contact_number = Some(contact_number.into());
        self
    }
}
