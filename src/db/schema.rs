//! Database schema and migrations for enrolld.
//!
//! This module contains all database migrations that will be applied
//! sequentially when the database is first opened or upgraded.

/// Database migrations.
///
/// Each migration is a SQL script that will be executed in order.
/// The schema_version table tracks which migrations have been applied.
pub const MIGRATIONS: &[&str] = &[
    // v1: Initial schema - accounts table
    r#"
-- Accounts table for schools and administrators
CREATE TABLE accounts (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    email           TEXT NOT NULL UNIQUE,
    password        TEXT NOT NULL,                 -- Argon2 hash
    role            TEXT NOT NULL DEFAULT 'user',  -- 'admin', 'user'
    district        TEXT NOT NULL DEFAULT '',
    school_id       INTEGER,                       -- User-role accounts only
    school_name     TEXT,
    contact_number  TEXT,
    created_at      TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX idx_accounts_email ON accounts(email);
CREATE INDEX idx_accounts_role ON accounts(role);
"#,
    // v2: Reset tokens table
    r#"
-- Single-use password reset tokens. Rows are never deleted; consumed
-- tokens are kept as an audit trail.
CREATE TABLE reset_tokens (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    account_id   INTEGER NOT NULL REFERENCES accounts(id),
    token        TEXT NOT NULL UNIQUE,
    created_at   TEXT NOT NULL DEFAULT (datetime('now')),
    consumed_at  TEXT
);

CREATE INDEX idx_reset_tokens_token ON reset_tokens(token);
CREATE INDEX idx_reset_tokens_account_id ON reset_tokens(account_id);
"#,
];
