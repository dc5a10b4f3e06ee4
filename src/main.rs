use std::sync::Arc;

use tracing::info;

use enrolld::mail::{Mailer, NullMailer, SmtpMailer};
use enrolld::{Config, Database, WebServer};

#[tokio::main]
async fn main() -> enrolld::Result<()> {
    // Load configuration
    let config = match Config::load_with_env("config.toml") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config.toml: {e}");
            eprintln!("Using default configuration.");
            let mut config = Config::default();
            config.apply_env_overrides();
            config
        }
    };

    // Initialize logging
    if let Err(e) = enrolld::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        // Fall back to console-only logging
        enrolld::logging::init_console_only(&config.logging.level);
    }

    config.validate()?;

    info!("enrolld - contest registration portal auth service");

    let db = Database::open(&config.database.path).await?;

    let mailer: Arc<dyn Mailer> = if config.mail.enabled {
        Arc::new(SmtpMailer::new(&config.mail)?)
    } else {
        info!("Mail delivery disabled; reset mails will be logged only");
        Arc::new(NullMailer::default())
    };

    let server = WebServer::new(&config.server, &config.auth, db, mailer)?;
    server.run().await
}
