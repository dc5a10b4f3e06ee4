//! Test helpers for Web API integration tests.

use std::sync::Arc;

use axum_test::TestServer;

use enrolld::config::AuthConfig;
use enrolld::mail::NullMailer;
use enrolld::web::handlers::AppState;
use enrolld::web::middleware::JwtState;
use enrolld::web::router::create_router;
use enrolld::{hash_password, AccountRepository, Database, NewAccount, Role};

/// Test application: server plus handles for direct inspection.
pub struct TestApp {
    pub server: TestServer,
    pub db: Database,
    pub mailer: Arc<NullMailer>,
}

/// Create a test auth configuration.
pub fn test_auth_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: "test-secret-key-for-testing-only".to_string(),
        session_expiry_days: 30,
        reset_token_expiry_minutes: 30,
        public_base_url: "https://enrollments.example.org".to_string(),
    }
}

/// Create a test server with an in-memory database and a recording mailer.
pub async fn create_test_app() -> TestApp {
    let db = Database::open_in_memory()
        .await
        .expect("Failed to create test database");
    let mailer = Arc::new(NullMailer::default());
    let auth_config = test_auth_config();

    let app_state = Arc::new(AppState::new(
        db.clone(),
        mailer.clone(),
        auth_config.clone(),
    ));
    let jwt_state = Arc::new(JwtState::new(&auth_config.jwt_secret));

    let router = create_router(app_state, jwt_state, &[]);
    let server = TestServer::new(router).expect("Failed to create test server");

    TestApp { server, db, mailer }
}

/// Reset mails go out on a detached task; poll until `expected` arrive.
#[allow(dead_code)]
pub async fn wait_for_sent_mail(mailer: &NullMailer, expected: usize) {
    for _ in 0..200 {
        if mailer.sent().len() >= expected {
            return;
        }
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }
    panic!("expected {expected} mails, got {}", mailer.sent().len());
}

/// Seed an account and return its ID.
pub async fn seed_account(
    db: &Database,
    email: &str,
    password: &str,
    role: Role,
    district: &str,
) -> i64 {
    let hash = hash_password(password).expect("Failed to hash password");
    AccountRepository::new(db.pool())
        .create(
            &NewAccount::new(email, hash)
                .with_role(role)
                .with_district(district),
        )
        .await
        .expect("Failed to seed account")
        .id
}
