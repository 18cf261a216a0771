//! Outbound mail dispatch interface.

use async_trait::async_trait;

use crate::errors::DomainError;

/// Message dispatch collaborator.
///
/// Implementations live in the infrastructure layer. A failed send surfaces
/// as [`DomainError::Delivery`]; the auth service is responsible for clearing
/// any one-time code or reset ticket it issued before the failed dispatch.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Sends a plain-text message to a single recipient
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), DomainError>;
}

/// Masks an email address for log output.
///
/// Keeps the first character of the local part and the full domain:
/// `ada@example.com` becomes `a***@example.com`.
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() => {
            let first = local.chars().next().unwrap_or('*');
            format!("{first}***@{domain}")
        }
        _ => "***".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_email_keeps_first_char_and_domain() {
        assert_eq!(mask_email("ada@example.com"), "a***@example.com");
        assert_eq!(mask_email("x@y.io"), "x***@y.io");
    }

    #[test]
    fn test_mask_email_handles_malformed_input() {
        assert_eq!(mask_email("not-an-email"), "***");
        assert_eq!(mask_email("@no-local.com"), "***");
    }
}
