//! Mock email dispatcher for development and tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tracing::info;

use fd_core::errors::DomainError;
use fd_core::services::{mask_email, Mailer};

/// Mailer that logs messages instead of sending them.
///
/// Bodies are logged in full (including codes) so developers can complete
/// flows locally without a mail provider.
pub struct MockEmailService {
    sent_count: AtomicUsize,
    fail: AtomicBool,
}

impl MockEmailService {
    /// Creates a new mock email service
    pub fn new() -> Self {
        Self {
            sent_count: AtomicUsize::new(0),
            fail: AtomicBool::new(false),
        }
    }

    /// Number of messages dispatched so far
    pub fn sent_count(&self) -> usize {
        self.sent_count.load(Ordering::SeqCst)
    }

    /// Makes every subsequent send fail, for exercising delivery-failure
    /// paths
    pub fn set_failing(&self, failing: bool) {
        self.fail.store(failing, Ordering::SeqCst);
    }
}

impl Default for MockEmailService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Mailer for MockEmailService {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), DomainError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(DomainError::Delivery {
                message: "mock mailer configured to fail".to_string(),
            });
        }

        self.sent_count.fetch_add(1, Ordering::SeqCst);
        info!(
            email = %mask_email(to),
            subject,
            body,
            "mock email dispatched"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_send_counts_messages() {
        let mailer = MockEmailService::new();
        mailer.send("a@x.com", "Hi", "body").await.unwrap();
        mailer.send("b@x.com", "Hi", "body").await.unwrap();
        assert_eq!(mailer.sent_count(), 2);
    }

    #[tokio::test]
    async fn test_simulated_failure() {
        let mailer = MockEmailService::new();
        mailer.set_failing(true);

        let result = mailer.send("a@x.com", "Hi", "body").await;
        assert!(matches!(result, Err(DomainError::Delivery { .. })));
        assert_eq!(mailer.sent_count(), 0);
    }
}
