//! POST /api/v1/auth/forgot-password

use actix_web::{web, HttpResponse};
use validator::Validate;

use fd_core::repositories::AccountRepository;
use fd_core::services::Mailer;
use fd_shared::types::ApiResponse;

use crate::app::AppState;
use crate::dto::auth::{ForgotPasswordRequest, MessageResponse};
use crate::handlers::{error_response, validation_error_response};

/// Starts a password reset by emailing a single-use token
pub async fn forgot_password<R, M>(
    state: web::Data<AppState<R, M>>,
    request: web::Json<ForgotPasswordRequest>,
) -> HttpResponse
where
    R: AccountRepository,
    M: Mailer,
{
    if let Err(errors) = request.validate() {
        return validation_error_response(&errors);
    }

    match state.auth_service.forgot_password(&request.email).await {
        Ok(()) => HttpResponse::Ok().json(ApiResponse::success(MessageResponse::new(
            "Password reset token sent to your email",
        ))),
        Err(err) => error_response(&err),
    }
}
