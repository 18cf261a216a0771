//! Authentication request and response DTOs.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use fd_core::domain::entities::account::{Account, AccountRole};
use fd_core::domain::value_objects::AuthenticatedAccount;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 8, max = 128))]
    pub password: String,

    pub password_confirmation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VerifyEmailRequest {
    #[validate(email)]
    pub email: String,

    /// 6-digit verification code
    #[validate(length(equal = 6))]
    pub code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ResendOtpRequest {
    #[validate(email)]
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TwoFactorRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1))]
    pub password: String,

    #[validate(length(equal = 6))]
    pub code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    #[validate(email)]
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    #[validate(email)]
    pub email: String,

    /// Plaintext reset token from the emailed link
    #[validate(length(min = 1))]
    pub token: String,

    #[validate(length(min = 8, max = 128))]
    pub password: String,

    pub password_confirmation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdatePasswordRequest {
    #[validate(length(min = 1))]
    pub current_password: String,

    #[validate(length(min = 8, max = 128))]
    pub password: String,

    pub password_confirmation: String,
}

/// Public view of an account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: AccountRole,
    pub is_email_verified: bool,
}

impl From<&Account> for AccountResponse {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            name: account.name.clone(),
            email: account.email.clone(),
            role: account.role,
            is_email_verified: account.is_email_verified,
        }
    }
}

/// Successful authentication payload; the same tokens also travel as
/// cookies
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub account_id: Uuid,
    pub name: String,
    pub email: String,
    pub role: AccountRole,
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
}

impl From<&AuthenticatedAccount> for AuthResponse {
    fn from(auth: &AuthenticatedAccount) -> Self {
        Self {
            account_id: auth.account_id,
            name: auth.name.clone(),
            email: auth.email.clone(),
            role: auth.role,
            access_token: auth.tokens.access_token.clone(),
            refresh_token: auth.tokens.refresh_token.clone(),
            expires_in: auth.tokens.access_expires_in,
        }
    }
}

/// Login response when the two-factor policy intervenes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TwoFactorPendingResponse {
    pub two_factor_required: bool,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
