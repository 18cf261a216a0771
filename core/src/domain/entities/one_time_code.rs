//! One-time codes for email verification and two-factor login.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Length of a one-time code
pub const CODE_LENGTH: usize = 6;

/// What a one-time code is allowed to prove
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OtpPurpose {
    /// Proving control of the signup email address
    EmailVerify,
    /// Password reset (the stored form is a hashed ticket, see `reset_ticket`)
    PasswordReset,
    /// Second factor for admin logins
    AdminTwoFactor,
}

impl OtpPurpose {
    /// Fixed time-to-live for codes of this purpose
    pub fn ttl(&self) -> Duration {
        match self {
            OtpPurpose::EmailVerify | OtpPurpose::PasswordReset => Duration::minutes(15),
            OtpPurpose::AdminTwoFactor => Duration::minutes(5),
        }
    }
}

/// Failure modes when checking a candidate code
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeError {
    #[error("code does not match")]
    Mismatch,
    #[error("code has expired")]
    Expired,
}

/// A short-lived numeric code owned by exactly one account at a time.
///
/// Generating a new code for a purpose overwrites any prior unconsumed code
/// of that purpose; the account stores at most one live code per purpose.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OneTimeCode {
    /// The 6-digit code value
    pub code: String,

    /// What this code proves
    pub purpose: OtpPurpose,

    /// Instant after which the code is no longer accepted
    pub expires_at: DateTime<Utc>,
}

impl OneTimeCode {
    /// Draws a uniformly random 6-digit code and stamps the purpose TTL.
    pub fn generate(purpose: OtpPurpose, now: DateTime<Utc>) -> Self {
        let mut rng = rand::thread_rng();
        let value: u32 = rng.gen_range(0..1_000_000);
        Self {
            code: format!("{:06}", value),
            purpose,
            expires_at: now + purpose.ttl(),
        }
    }

    /// Checks whether the code has expired at `now`
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Checks a candidate against this code.
    ///
    /// Comparison is string-exact with no normalization. A mismatch is
    /// reported before expiry so an attacker cannot probe code liveness,
    /// matching the login-flow ordering of the original checks.
    pub fn check(&self, candidate: &str, now: DateTime<Utc>) -> Result<(), CodeError> {
        if self.code != candidate {
            return Err(CodeError::Mismatch);
        }
        if self.is_expired(now) {
            return Err(CodeError::Expired);
        }
        Ok(())
    }
}
