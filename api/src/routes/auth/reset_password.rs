//! POST /api/v1/auth/reset-password

use actix_web::{web, HttpResponse};
use validator::Validate;

use fd_core::repositories::AccountRepository;
use fd_core::services::Mailer;
use fd_shared::types::ApiResponse;

use crate::app::AppState;
use crate::dto::auth::{MessageResponse, ResetPasswordRequest};
use crate::handlers::{error_response, validation_error_response};

/// Completes a password reset with the emailed token.
///
/// No tokens are issued; the caller logs in again with the new password.
/// Every session is revoked, so outstanding refresh tokens die with the
/// old password.
pub async fn reset_password<R, M>(
    state: web::Data<AppState<R, M>>,
    request: web::Json<ResetPasswordRequest>,
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
        .reset_password(
            &request.email,
            &request.token,
            &request.password,
            &request.password_confirmation,
        )
        .await
    {
        Ok(()) => HttpResponse::Ok().json(ApiResponse::success(MessageResponse::new(
            "Password has been reset, please log in",
        ))),
        Err(err) => error_response(&err),
    }
}
