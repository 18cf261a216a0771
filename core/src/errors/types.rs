//! Error type definitions for authentication, token, and validation
//! failures. User-facing wording lives in the presentation layer; variants
//! here carry only what handlers need to pick a status and a safe message.

use thiserror::Error;

/// Authentication-related errors
///
/// Messages for credential failures are deliberately generic so response
/// bodies cannot be used for account enumeration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Already registered email")]
    EmailAlreadyRegistered,

    #[error("Account not found")]
    AccountNotFound,

    #[error("Email already verified")]
    EmailAlreadyVerified,

    #[error("Invalid one-time code")]
    InvalidOneTimeCode,

    #[error("One-time code expired")]
    OneTimeCodeExpired,

    #[error("Account not found or reset token invalid")]
    InvalidResetTicket,

    #[error("Reset token expired")]
    ResetTicketExpired,

    #[error("Maximum number of active sessions reached")]
    TooManySessions,

    #[error("Session not found")]
    SessionNotFound,

    #[error("New password must differ from the current password")]
    SamePassword,

    #[error("Account is not active")]
    InactiveAccount,

    #[error("Password was changed after this token was issued")]
    PasswordChanged,
}

/// Token-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// TTL elapsed; the caller should log in again
    #[error("Token expired")]
    Expired,

    /// Malformed token or bad signature; the session is invalid
    #[error("Invalid token")]
    Invalid,

    #[error("Token missing")]
    Missing,

    #[error("Token generation failed")]
    GenerationFailed,
}

/// Input validation errors; always safe to show verbatim
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required field: {field}")]
    RequiredField { field: String },

    #[error("Invalid email format")]
    InvalidEmail,

    #[error("Password must be at least {min} characters")]
    PasswordTooShort { min: usize },

    #[error("Password and password confirmation do not match")]
    PasswordMismatch,
}
