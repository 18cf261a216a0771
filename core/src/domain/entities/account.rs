//! Account entity: the identity record at the heart of the auth core.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::one_time_code::{OneTimeCode, OtpPurpose};
use super::reset_ticket::PasswordResetTicket;
use super::session::SessionSet;

/// Role of an account in the marketplace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AccountRole {
    /// Ordering customer (default for signups)
    Customer,
    /// Platform administrator
    Admin,
    /// Courier delivering orders
    DeliveryAgent,
    /// Restaurant owner managing menus
    RestaurantOwner,
}

impl Default for AccountRole {
    fn default() -> Self {
        AccountRole::Customer
    }
}

/// A registered account.
///
/// Ephemeral secrets (verification code, two-factor code, reset ticket) are
/// explicit optional values with a single clear path each, so every failure
/// branch invalidates them the same way. The `version` stamp backs optimistic
/// concurrency on the session collection: repository updates are conditional
/// on the observed version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier
    pub id: Uuid,

    /// Case-normalized email, unique across all accounts
    pub email: String,

    /// Display name
    pub name: String,

    /// Bcrypt hash of the password; never empty while the account is active
    pub password_hash: String,

    /// Role in the marketplace
    pub role: AccountRole,

    /// Soft-delete flag; accounts are deactivated, never hard-deleted
    pub is_active: bool,

    /// Set exactly once via OTP confirmation
    pub is_email_verified: bool,

    /// Dedicated delivery address for admin two-factor codes
    pub two_factor_email: Option<String>,

    /// Live email-verification code, if any
    pub otp: Option<OneTimeCode>,

    /// Live admin two-factor code, if any
    pub two_factor_code: Option<OneTimeCode>,

    /// Live password-reset ticket, if any
    pub password_reset: Option<PasswordResetTicket>,

    /// Active per-device sessions
    pub sessions: SessionSet,

    /// Stamped on every password change; access tokens issued before this
    /// instant are rejected by the request guard
    pub password_changed_at: Option<DateTime<Utc>>,

    /// Timestamp when the account was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the account was last updated
    pub updated_at: DateTime<Utc>,

    /// Optimistic-concurrency stamp, bumped by the repository on every save
    pub version: u64,
}

impl Account {
    /// Creates a new unverified account
    pub fn new(name: String, email: &str, password_hash: String, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: Self::normalize_email(email),
            name,
            password_hash,
            role: AccountRole::default(),
            is_active: true,
            is_email_verified: false,
            two_factor_email: None,
            otp: None,
            two_factor_code: None,
            password_reset: None,
            sessions: SessionSet::default(),
            password_changed_at: None,
            created_at: now,
            updated_at: now,
            version: 0,
        }
    }

    /// Case-normalizes an email address for lookup and storage
    pub fn normalize_email(raw: &str) -> String {
        raw.trim().to_lowercase()
    }

    /// Marks the email as verified; terminal, there is no path back
    pub fn verify_email(&mut self, now: DateTime<Utc>) {
        self.is_email_verified = true;
        self.updated_at = now;
    }

    /// Soft-deactivates the account
    pub fn deactivate(&mut self, now: DateTime<Utc>) {
        self.is_active = false;
        self.sessions.clear();
        self.updated_at = now;
    }

    /// Stores a code, silently discarding any prior code of the same purpose
    pub fn store_code(&mut self, code: OneTimeCode, now: DateTime<Utc>) {
        match code.purpose {
            OtpPurpose::EmailVerify => self.otp = Some(code),
            OtpPurpose::AdminTwoFactor => self.two_factor_code = Some(code),
            // Reset credentials are hashed tickets, not stored codes
            OtpPurpose::PasswordReset => {}
        }
        self.updated_at = now;
    }

    /// The single invalidation path for ephemeral codes of a purpose.
    ///
    /// Called on successful consumption, on failed expiry checks, and on
    /// delivery failures, so no branch can leave a dangling valid code.
    pub fn clear_code(&mut self, purpose: OtpPurpose, now: DateTime<Utc>) {
        match purpose {
            OtpPurpose::EmailVerify => self.otp = None,
            OtpPurpose::AdminTwoFactor => self.two_factor_code = None,
            OtpPurpose::PasswordReset => self.password_reset = None,
        }
        self.updated_at = now;
    }

    /// Stores a reset ticket, silently invalidating any unconsumed prior one
    pub fn store_reset_ticket(&mut self, ticket: PasswordResetTicket, now: DateTime<Utc>) {
        self.password_reset = Some(ticket);
        self.updated_at = now;
    }

    /// Replaces the password hash and stamps the change instant
    pub fn set_password(&mut self, password_hash: String, now: DateTime<Utc>) {
        self.password_hash = password_hash;
        self.password_changed_at = Some(now);
        self.updated_at = now;
    }

    /// Whether an access token issued at `iat` predates the last password
    /// change and must be rejected.
    ///
    /// Token `iat` claims carry whole-second precision, so the comparison
    /// happens at that granularity; a token minted in the same second as the
    /// change (notably the pair issued by the change itself) stays valid.
    pub fn password_changed_after(&self, iat: DateTime<Utc>) -> bool {
        self.password_changed_at
            .map(|changed| changed.timestamp() > iat.timestamp())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::one_time_code::OneTimeCode;

    fn account() -> Account {
        Account::new(
            "Ada".to_string(),
            "Ada@Example.COM",
            "$2b$12$hash".to_string(),
            Utc::now(),
        )
    }

    #[test]
    fn test_new_account_defaults() {
        let account = account();
        assert_eq!(account.email, "ada@example.com");
        assert_eq!(account.role, AccountRole::Customer);
        assert!(account.is_active);
        assert!(!account.is_email_verified);
        assert!(account.otp.is_none());
        assert!(account.sessions.is_empty());
        assert_eq!(account.version, 0);
    }

    #[test]
    fn test_email_normalization() {
        assert_eq!(Account::normalize_email("  A@B.Com "), "a@b.com");
    }

    #[test]
    fn test_verify_email() {
        let mut account = account();
        account.verify_email(Utc::now());
        assert!(account.is_email_verified);
    }

    #[test]
    fn test_store_code_overwrites_same_purpose() {
        let mut account = account();
        let now = Utc::now();
        let first = OneTimeCode::generate(OtpPurpose::EmailVerify, now);
        let second = OneTimeCode::generate(OtpPurpose::EmailVerify, now);
        let second_value = second.code.clone();

        account.store_code(first, now);
        account.store_code(second, now);

        assert_eq!(account.otp.as_ref().unwrap().code, second_value);
    }

    #[test]
    fn test_clear_code_is_the_single_invalidation_path() {
        let mut account = account();
        let now = Utc::now();
        account.store_code(OneTimeCode::generate(OtpPurpose::EmailVerify, now), now);
        account.store_code(OneTimeCode::generate(OtpPurpose::AdminTwoFactor, now), now);

        account.clear_code(OtpPurpose::EmailVerify, now);
        assert!(account.otp.is_none());
        assert!(account.two_factor_code.is_some());

        account.clear_code(OtpPurpose::AdminTwoFactor, now);
        assert!(account.two_factor_code.is_none());
    }

    #[test]
    fn test_set_password_stamps_changed_at() {
        let mut account = account();
        let before = Utc::now();
        assert!(!account.password_changed_after(before));

        let change_instant = before + chrono::Duration::seconds(5);
        account.set_password("$2b$12$newhash".to_string(), change_instant);

        assert!(account.password_changed_after(before));
        assert!(!account.password_changed_after(change_instant + chrono::Duration::seconds(1)));
    }

    #[test]
    fn test_password_change_compares_at_second_granularity() {
        let mut account = account();
        let second = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let mid_second = second + chrono::Duration::milliseconds(500);

        account.set_password("$2b$12$newhash".to_string(), mid_second);

        // A token minted in the same second as the change stays valid
        assert!(!account.password_changed_after(second));
        assert!(account.password_changed_after(second - chrono::Duration::seconds(1)));
    }

    #[test]
    fn test_deactivate_clears_sessions() {
        let mut account = account();
        let now = Utc::now();
        account
            .sessions
            .add(crate::domain::entities::session::Session::new(
                "tok".to_string(),
                "ip".to_string(),
                "ua".to_string(),
                now,
            ))
            .unwrap();

        account.deactivate(now);
        assert!(!account.is_active);
        assert!(account.sessions.is_empty());
    }
}
