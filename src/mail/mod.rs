//! Outgoing mail for enrolld.
//!
//! The reset flow is the only mail producer. Delivery is fire-and-forget
//! from the caller's perspective: the `Mailer` returns errors so they can
//! be logged, but no caller surfaces them to the end user.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::sync::Mutex;
use tracing::info;

use crate::config::MailConfig;
use crate::{EnrolldError, Result};

/// Mail sending contract.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send an HTML email.
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<()>;
}

/// SMTP mailer backed by lettre.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: String,
}

impl SmtpMailer {
    /// Create an SMTP mailer from configuration.
    pub fn new(config: &MailConfig) -> Result<Self> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
            .map_err(|e| EnrolldError::Mail(e.to_string()))?
            .port(config.smtp_port);

        if !config.smtp_username.is_empty() {
            builder = builder.credentials(Credentials::new(
                config.smtp_username.clone(),
                config.smtp_password.clone(),
            ));
        }

        Ok(Self {
            transport: builder.build(),
            from: config.from_address.clone(),
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<()> {
        let message = Message::builder()
            .from(
                self.from
                    .parse()
                    .map_err(|e| EnrolldError::Mail(format!("invalid from address: {e}")))?,
            )
            .to(to
                .parse()
                .map_err(|e| EnrolldError::Mail(format!("invalid recipient: {e}")))?)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html_body.to_string())
            .map_err(|e| EnrolldError::Mail(e.to_string()))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| EnrolldError::Mail(e.to_string()))?;

        Ok(())
    }
}

/// Mailer that records messages instead of sending them.
///
/// Used when SMTP delivery is disabled (development) and in tests, where
/// `sent()` exposes what would have gone out.
#[derive(Default)]
pub struct NullMailer {
    sent: Mutex<Vec<(String, String, String)>>,
}

impl NullMailer {
    /// Messages recorded so far as (to, subject, body) tuples.
    pub fn sent(&self) -> Vec<(String, String, String)> {
        self.sent.lock().expect("mailer lock poisoned").clone()
    }
}

#[async_trait]
impl Mailer for NullMailer {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<()> {
        info!(to, subject, "mail delivery disabled; message not sent");
        self.sent.lock().expect("mailer lock poisoned").push((
            to.to_string(),
            subject.to_string(),
            html_body.to_string(),
        ));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_null_mailer_records_messages() {
        let mailer = NullMailer::default();

        mailer
            .send("a@x.com", "Subject", "<p>Body</p>")
            .await
            .unwrap();

        let sent = mailer.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "a@x.com");
        assert_eq!(sent[0].1, "Subject");
        assert_eq!(sent[0].2, "<p>Body</p>");
    }

    #[test]
    fn test_smtp_mailer_builds_from_config() {
        let config = MailConfig {
            enabled: true,
            smtp_host: "smtp.example.com".to_string(),
            smtp_username: "mailer".to_string(),
            smtp_password: "secret".to_string(),
            ..MailConfig::default()
        };
        assert!(SmtpMailer::new(&config).is_ok());
    }
}
