//! Shared fixtures for auth service tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::entities::account::{Account, AccountRole};
use crate::errors::DomainError;
// Re-exported so the glob import in the test modules brings the trait
// methods into scope alongside the mock
pub use crate::repositories::{AccountRepository, MockAccountRepository};
use crate::services::auth::{AuthConfig, AuthService};
use crate::services::clock::{Clock, FixedClock};
use crate::services::mail::Mailer;
use crate::services::password::PasswordHasher;
use crate::services::token::{TokenConfig, TokenService};

/// One captured outbound message
#[derive(Debug, Clone)]
pub struct SentMail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Mailer that records every message and can simulate delivery failure
pub struct MockMailer {
    sent: Mutex<Vec<SentMail>>,
    fail: AtomicBool,
}

impl MockMailer {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: AtomicBool::new(false),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.fail.store(failing, Ordering::SeqCst);
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    pub fn last(&self) -> Option<SentMail> {
        self.sent.lock().unwrap().last().cloned()
    }

    /// Extracts the 6-digit code from the most recent message
    pub fn last_code(&self) -> Option<String> {
        let mail = self.last()?;
        mail.body
            .split_whitespace()
            .map(|word| word.trim_matches(|c: char| !c.is_ascii_digit()))
            .find(|word| word.len() == 6 && word.chars().all(|c| c.is_ascii_digit()))
            .map(str::to_string)
    }

    /// Extracts the hex reset token from the most recent message
    pub fn last_reset_token(&self) -> Option<String> {
        let mail = self.last()?;
        mail.body
            .split_whitespace()
            .find(|word| word.len() == 64 && word.chars().all(|c| c.is_ascii_hexdigit()))
            .map(str::to_string)
    }
}

#[async_trait]
impl Mailer for MockMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), DomainError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(DomainError::Delivery {
                message: "simulated dispatch failure".to_string(),
            });
        }
        self.sent.lock().unwrap().push(SentMail {
            to: to.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}

/// Fully wired auth service over in-memory collaborators
pub struct TestHarness {
    pub service: AuthService<MockAccountRepository, MockMailer>,
    pub repository: Arc<MockAccountRepository>,
    pub mailer: Arc<MockMailer>,
    pub clock: Arc<FixedClock>,
}

pub fn harness() -> TestHarness {
    harness_with(AuthConfig::default())
}

pub fn harness_with(config: AuthConfig) -> TestHarness {
    let repository = Arc::new(MockAccountRepository::new());
    let mailer = Arc::new(MockMailer::new());
    let clock = Arc::new(FixedClock::new(Utc::now()));
    let tokens = Arc::new(TokenService::new(TokenConfig::default()));
    // Minimum bcrypt cost keeps the suite fast
    let hasher = PasswordHasher::new(4);

    let service = AuthService::new(
        Arc::clone(&repository),
        Arc::clone(&mailer),
        tokens,
        hasher,
        Arc::clone(&clock) as Arc<dyn Clock>,
        config,
    );

    TestHarness {
        service,
        repository,
        mailer,
        clock,
    }
}

/// Signs up and verifies an account in one step
pub async fn signup_verified(h: &TestHarness, email: &str, password: &str) -> Account {
    h.service
        .signup("Test User", email, password, password)
        .await
        .unwrap();
    let code = h.mailer.last_code().unwrap();
    h.service.verify_email(email, &code).await.unwrap()
}

/// Promotes a stored account to the admin role
pub async fn promote_to_admin(repo: &MockAccountRepository, email: &str) {
    let mut account = repo.find_by_email(email).await.unwrap().unwrap();
    account.role = AccountRole::Admin;
    repo.update(account).await.unwrap();
}
