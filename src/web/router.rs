//! Router configuration for the Web API.

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::handlers::{change_password, login, me, page, reset_password, AppState};
use super::middleware::{create_cors_layer, route_gate, session_state, JwtState};

/// Create the main API router.
pub fn create_router(
    app_state: Arc<AppState>,
    jwt_state: Arc<JwtState>,
    cors_origins: &[String],
) -> Router {
    // Auth API routes
    let auth_routes = Router::new()
        .route("/login", post(login))
        .route("/reset-password", post(reset_password))
        .route("/change-password", put(change_password))
        .route("/me", get(me));

    let api_routes = Router::new().nest("/auth", auth_routes);

    // Page routes pass through the route gate
    let page_routes = Router::new()
        .route("/login", get(page))
        .route("/register", get(page))
        .route("/forgot-password", get(page))
        .route("/dashboard", get(page))
        .route("/admin", get(page))
        .route("/admin/*path", get(page))
        .route("/user", get(page))
        .route("/user/*path", get(page))
        .layer(middleware::from_fn(route_gate));

    // Clone jwt_state for the middleware closure
    let jwt_state_for_middleware = jwt_state.clone();

    Router::new()
        .nest("/api", api_routes)
        .merge(page_routes)
        .route("/health", get(health_check))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_origins))
                .layer(middleware::from_fn(move |req, next| {
                    let state = jwt_state_for_middleware.clone();
                    session_state(state, req, next)
                })),
        )
        .with_state(app_state)
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}
