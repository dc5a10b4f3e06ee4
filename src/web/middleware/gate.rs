//! Route gate middleware.
//!
//! Runs once per request on the gated page routes. Decodes the session, if
//! any, and turns the pure gate decision into a response: pass through,
//! redirect to login, or redirect to the default page. Internal errors
//! fail closed with a server error, never with access.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use jsonwebtoken::decode;
use std::sync::Arc;

use super::auth::{extract_session_token, JwtState, SessionClaims};
use crate::auth::{evaluate, RouteDecision, DEFAULT_PATH, LOGIN_PATH};

/// Gate an incoming page request.
pub async fn route_gate(request: Request<Body>, next: Next) -> Response {
    let Some(jwt_state) = request.extensions().get::<Arc<JwtState>>().cloned() else {
        // Fail closed: without the decode state we cannot authorize anything
        tracing::error!("route gate invoked without session state");
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    };

    // Absence and decode failure are the same thing to the gate: no claims
    let role = extract_session_token(request.headers()).and_then(|token| {
        decode::<SessionClaims>(&token, &jwt_state.decoding_key, &jwt_state.validation)
            .map(|data| data.claims.role)
            .map_err(|e| tracing::debug!("session decode failed at gate: {}", e))
            .ok()
    });

    let path = request.uri().path();
    match evaluate(role.as_deref(), path) {
        RouteDecision::Allow => next.run(request).await,
        RouteDecision::RedirectToLogin => {
            tracing::debug!(path, "no session; redirecting to login");
            Redirect::to(LOGIN_PATH).into_response()
        }
        RouteDecision::RedirectToDefault => {
            tracing::debug!(path, "path outside role routes; redirecting to default");
            Redirect::to(DEFAULT_PATH).into_response()
        }
    }
}
