//! Outbound email dispatch.
//!
//! Implements the core's `Mailer` collaborator: SendGrid's HTTP API for
//! production and a console-logging mock for development and tests.

pub mod mock_email;
pub mod sendgrid;

pub use mock_email::MockEmailService;
pub use sendgrid::{SendGridConfig, SendGridMailer};

use async_trait::async_trait;

use fd_core::errors::DomainError;
use fd_core::services::Mailer;

use crate::InfrastructureError;

/// Provider-selected mailer handed to the auth service
pub enum EmailDispatcher {
    SendGrid(SendGridMailer),
    Mock(MockEmailService),
}

#[async_trait]
impl Mailer for EmailDispatcher {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), DomainError> {
        match self {
            EmailDispatcher::SendGrid(mailer) => mailer.send(to, subject, body).await,
            EmailDispatcher::Mock(mailer) => mailer.send(to, subject, body).await,
        }
    }
}

/// Creates a mailer based on the `EMAIL_PROVIDER` environment variable.
///
/// `sendgrid` selects the production dispatcher; anything else (or an unset
/// variable) falls back to the console mock.
pub fn create_mailer() -> Result<EmailDispatcher, InfrastructureError> {
    match std::env::var("EMAIL_PROVIDER").as_deref() {
        Ok("sendgrid") => {
            let config = SendGridConfig::from_env()?;
            Ok(EmailDispatcher::SendGrid(SendGridMailer::new(config)))
        }
        _ => {
            tracing::info!("EMAIL_PROVIDER not set to a real provider, using mock mailer");
            Ok(EmailDispatcher::Mock(MockEmailService::new()))
        }
    }
}
