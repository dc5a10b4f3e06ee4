//! Route gate: per-request authorization decisions.
//!
//! The gate inspects the session's role claim and the requested path and
//! produces one of three terminal decisions. The role-to-prefix mapping is
//! a total match over the closed [`Role`] enum; a token carrying a role
//! string outside the enum gets an empty allowed set and is redirected,
//! never allowed through.

use std::str::FromStr;

use crate::db::Role;

/// Path the gate redirects unauthenticated requests to.
pub const LOGIN_PATH: &str = "/login";

/// Path the gate redirects authorized-but-misrouted requests to.
pub const DEFAULT_PATH: &str = "/dashboard";

/// Paths reachable without a session.
pub const PUBLIC_PATHS: &[&str] = &["/login", "/register", "/forgot-password"];

/// Terminal decision for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    /// Let the request through.
    Allow,
    /// No session; send to the login page.
    RedirectToLogin,
    /// Session present but the path is outside the role's set; send to the
    /// default page.
    RedirectToDefault,
}

/// Allowed path prefixes per role.
pub fn allowed_prefixes(role: Role) -> &'static [&'static str] {
    match role {
        Role::Admin => &["/admin", "/dashboard"],
        Role::User => &["/user", "/dashboard"],
    }
}

/// Evaluate the gate for one request.
///
/// `role_claim` is the raw role string from the decoded session, or `None`
/// when no session token was present or it failed to decode.
pub fn evaluate(role_claim: Option<&str>, path: &str) -> RouteDecision {
    match role_claim {
        None => {
            if PUBLIC_PATHS.contains(&path) {
                RouteDecision::Allow
            } else {
                RouteDecision::RedirectToLogin
            }
        }
        Some(claim) => {
            // Unknown role strings get an empty allowed set
            let prefixes = match Role::from_str(claim) {
                Ok(role) => allowed_prefixes(role),
                Err(_) => &[][..],
            };

            if prefixes.iter().any(|prefix| path.starts_with(prefix)) {
                RouteDecision::Allow
            } else {
                RouteDecision::RedirectToDefault
            }
        }
    }
}
