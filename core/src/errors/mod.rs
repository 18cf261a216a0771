//! Domain-specific error types and error handling.

mod types;

pub use types::{AuthError, TokenError, ValidationError};

use thiserror::Error;

/// Core domain errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    /// Conditional repository update observed a stale version; flows retry
    /// their read-modify-write on this
    #[error("Concurrent update conflict")]
    VersionConflict,

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    /// Outbound message dispatch failed; retryable, and any just-issued
    /// ephemeral secret has been cleared before this is returned
    #[error("Delivery failure: {message}")]
    Delivery { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    ValidationErr(#[from] ValidationError),
}

pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_bridges_into_domain_error() {
        let err: DomainError = AuthError::TooManySessions.into();
        assert!(matches!(err, DomainError::Auth(AuthError::TooManySessions)));
    }

    #[test]
    fn test_messages_stay_generic_for_credentials() {
        assert_eq!(AuthError::InvalidCredentials.to_string(), "Invalid credentials");
    }
}
