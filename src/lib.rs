//! enrolld - Contest-registration portal authentication service
//!
//! Credential login, stateless session tokens, single-use password reset
//! tokens, and role-based route gating for a school contest-registration
//! portal.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod mail;
pub mod web;

pub use auth::{
    consume_reset, evaluate, generate_reset_token, hash_password, request_reset,
    validate_password, verify_credentials, verify_password, PasswordError, RouteDecision,
    DEFAULT_PATH, LOGIN_PATH, PUBLIC_PATHS,
};
pub use config::Config;
pub use db::{Account, AccountClaims, AccountRepository, Database, NewAccount, Role};
pub use error::{EnrolldError, Result};
pub use web::WebServer;
