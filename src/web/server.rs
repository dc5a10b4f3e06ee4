//! Web server for enrolld.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use crate::config::{AuthConfig, ServerConfig};
use crate::mail::Mailer;
use crate::{Database, EnrolldError, Result};

use super::handlers::AppState;
use super::middleware::JwtState;
use super::router::create_router;

/// Web server for the API.
pub struct WebServer {
    /// Server address.
    addr: SocketAddr,
    /// Application state.
    app_state: Arc<AppState>,
    /// Session state.
    jwt_state: Arc<JwtState>,
    /// CORS allowed origins.
    cors_origins: Vec<String>,
}

impl WebServer {
    /// Create a new web server.
    pub fn new(
        server_config: &ServerConfig,
        auth_config: &AuthConfig,
        db: Database,
        mailer: Arc<dyn Mailer>,
    ) -> Result<Self> {
        let addr = format!("{}:{}", server_config.host, server_config.port)
            .parse()
            .map_err(|e| EnrolldError::Config(format!("invalid server address: {e}")))?;

        let jwt_state = Arc::new(JwtState::new(&auth_config.jwt_secret));
        let app_state = Arc::new(AppState::new(db, mailer, auth_config.clone()));

        Ok(Self {
            addr,
            app_state,
            jwt_state,
            cors_origins: server_config.cors_origins.clone(),
        })
    }

    /// Run the server until shutdown.
    pub async fn run(self) -> Result<()> {
        let router = create_router(self.app_state, self.jwt_state, &self.cors_origins);

        let listener = TcpListener::bind(self.addr).await?;
        info!("Web server listening on {}", self.addr);

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}

/// Wait for Ctrl+C.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
    }
    info!("Shutdown signal received");
}
