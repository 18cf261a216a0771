//! SendGrid email dispatch via the v3 HTTP API.

use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, error};

use fd_core::errors::DomainError;
use fd_core::services::{mask_email, Mailer};

use crate::InfrastructureError;

const SENDGRID_SEND_URL: &str = "https://api.sendgrid.com/v3/mail/send";

/// SendGrid dispatcher configuration
#[derive(Debug, Clone)]
pub struct SendGridConfig {
    /// SendGrid API key
    pub api_key: String,
    /// Sender address, must be a verified SendGrid sender
    pub from_email: String,
    /// Human-readable sender name
    pub from_name: String,
    /// Timeout for API requests in seconds
    pub request_timeout_secs: u64,
}

impl SendGridConfig {
    /// Creates configuration from environment variables
    pub fn from_env() -> Result<Self, InfrastructureError> {
        let api_key = std::env::var("SENDGRID_API_KEY")
            .map_err(|_| InfrastructureError::Config("SENDGRID_API_KEY not set".to_string()))?;
        let from_email = std::env::var("SENDGRID_FROM_EMAIL")
            .map_err(|_| InfrastructureError::Config("SENDGRID_FROM_EMAIL not set".to_string()))?;

        Ok(Self {
            api_key,
            from_email,
            from_name: std::env::var("SENDGRID_FROM_NAME")
                .unwrap_or_else(|_| "FoodyDrop".to_string()),
            request_timeout_secs: std::env::var("SENDGRID_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
        })
    }
}

#[derive(Serialize)]
struct Address<'a> {
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

#[derive(Serialize)]
struct Personalization<'a> {
    to: [Address<'a>; 1],
}

#[derive(Serialize)]
struct Content<'a> {
    r#type: &'a str,
    value: &'a str,
}

#[derive(Serialize)]
struct SendRequest<'a> {
    personalizations: [Personalization<'a>; 1],
    from: Address<'a>,
    subject: &'a str,
    content: [Content<'a>; 1],
}

/// Production mailer backed by SendGrid
pub struct SendGridMailer {
    client: reqwest::Client,
    config: SendGridConfig,
}

impl SendGridMailer {
    /// Creates a SendGrid mailer with a shared HTTP client
    pub fn new(config: SendGridConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .unwrap_or_default();
        Self { client, config }
    }
}

#[async_trait]
impl Mailer for SendGridMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), DomainError> {
        let request = SendRequest {
            personalizations: [Personalization {
                to: [Address { email: to, name: None }],
            }],
            from: Address {
                email: &self.config.from_email,
                name: Some(&self.config.from_name),
            },
            subject,
            content: [Content {
                r#type: "text/plain",
                value: body,
            }],
        };

        let response = self
            .client
            .post(SENDGRID_SEND_URL)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| DomainError::Delivery {
                message: format!("sendgrid request failed: {e}"),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            error!(
                email = %mask_email(to),
                %status,
                "sendgrid rejected the message"
            );
            return Err(DomainError::Delivery {
                message: format!("sendgrid returned {status}"),
            });
        }

        debug!(email = %mask_email(to), "email dispatched");
        Ok(())
    }
}
