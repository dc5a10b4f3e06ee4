//! Middleware for the Web API.

pub mod auth;
pub mod cors;
pub mod gate;

pub use auth::{
    extract_session_token, session_state, JwtState, OptionalSessionUser, SessionClaims,
    SessionUser, SESSION_COOKIE,
};
pub use cors::create_cors_layer;
pub use gate::route_gate;
