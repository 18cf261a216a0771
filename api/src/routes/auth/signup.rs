//! POST /api/v1/auth/signup

use actix_web::{web, HttpResponse};
use validator::Validate;

use fd_core::repositories::AccountRepository;
use fd_core::services::Mailer;
use fd_shared::types::ApiResponse;

use crate::app::AppState;
use crate::dto::auth::{AccountResponse, SignupRequest};
use crate::handlers::{error_response, validation_error_response};

/// Registers a new account and dispatches the verification code.
///
/// The account is created unverified; the caller must complete
/// `/verify-email` before logging in. If the verification email cannot be
/// delivered the account is kept and the caller may retry via
/// `/resend-otp`.
pub async fn signup<R, M>(
    state: web::Data<AppState<R, M>>,
    request: web::Json<SignupRequest>,
) -> HttpResponse
where
    R: AccountRepository,
    M: Mailer,
{
    if let Err(errors) = request.validate() {
        return validation_error_response(&errors);
    }

    match state
        .auth_service
        .signup(
            &request.name,
            &request.email,
            &request.password,
            &request.password_confirmation,
        )
        .await
    {
        Ok(account) => {
            HttpResponse::Created().json(ApiResponse::success(AccountResponse::from(&account)))
        }
        Err(err) => error_response(&err),
    }
}
