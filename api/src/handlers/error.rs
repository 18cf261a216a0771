//! Domain-error to HTTP response mapping.
//!
//! Authentication failures stay generic in the body; internal failures are
//! logged and surfaced as an opaque message so persistence details never
//! reach the caller.

use actix_web::HttpResponse;
use tracing::error;
use validator::ValidationErrors;

use fd_core::errors::{AuthError, DomainError, TokenError};
use fd_shared::types::ApiResponse;

/// Maps a domain error to its HTTP response
pub fn error_response(err: &DomainError) -> HttpResponse {
    match err {
        DomainError::Validation { message } => bad_request(message),
        DomainError::ValidationErr(e) => bad_request(&e.to_string()),

        DomainError::Conflict { message } => bad_request(message),
        DomainError::VersionConflict => HttpResponse::Conflict()
            .json(ApiResponse::<()>::error("Please retry the request")),

        DomainError::NotFound { resource } => {
            HttpResponse::NotFound().json(ApiResponse::<()>::error(format!("{resource} not found")))
        }

        DomainError::Delivery { .. } => HttpResponse::InternalServerError().json(
            ApiResponse::<()>::error("There was an error sending the email, try again later"),
        ),

        DomainError::Internal { message } => {
            error!(%message, "internal error");
            HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Something went wrong"))
        }

        DomainError::Auth(e) => auth_error_response(e),
        DomainError::Token(e) => token_error_response(e),
    }
}

fn auth_error_response(err: &AuthError) -> HttpResponse {
    let message = err.to_string();
    match err {
        AuthError::InvalidCredentials
        | AuthError::InactiveAccount
        | AuthError::PasswordChanged
        | AuthError::SessionNotFound => unauthorized(&message),

        AuthError::AccountNotFound => {
            HttpResponse::NotFound().json(ApiResponse::<()>::error(message))
        }

        AuthError::EmailAlreadyRegistered
        | AuthError::EmailAlreadyVerified
        | AuthError::InvalidOneTimeCode
        | AuthError::OneTimeCodeExpired
        | AuthError::InvalidResetTicket
        | AuthError::ResetTicketExpired
        | AuthError::TooManySessions
        | AuthError::SamePassword => bad_request(&message),
    }
}

fn token_error_response(err: &TokenError) -> HttpResponse {
    match err {
        TokenError::Expired => unauthorized("Token expired, please log in again"),
        TokenError::Invalid | TokenError::Missing => unauthorized(&err.to_string()),
        TokenError::GenerationFailed => HttpResponse::InternalServerError()
            .json(ApiResponse::<()>::error("Something went wrong")),
    }
}

/// Maps validator derive failures to a 400 response
pub fn validation_error_response(errors: &ValidationErrors) -> HttpResponse {
    let detail = errors
        .field_errors()
        .iter()
        .map(|(field, errs)| {
            let reason = errs
                .first()
                .and_then(|e| e.message.as_ref())
                .map(|m| m.to_string())
                .unwrap_or_else(|| "invalid value".to_string());
            format!("{field}: {reason}")
        })
        .collect::<Vec<_>>()
        .join("; ");
    bad_request(&detail)
}

fn bad_request(message: &str) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::<()>::error(message))
}

fn unauthorized(message: &str) -> HttpResponse {
    HttpResponse::Unauthorized().json(ApiResponse::<()>::error(message))
}
