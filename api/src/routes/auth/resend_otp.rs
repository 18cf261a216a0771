//! POST /api/v1/auth/resend-otp

use actix_web::{web, HttpResponse};
use validator::Validate;

use fd_core::repositories::AccountRepository;
use fd_core::services::Mailer;
use fd_shared::types::ApiResponse;

use crate::app::AppState;
use crate::dto::auth::{MessageResponse, ResendOtpRequest};
use crate::handlers::{error_response, validation_error_response};

/// Re-issues the email verification code, replacing any outstanding one
pub async fn resend_otp<R, M>(
    state: web::Data<AppState<R, M>>,
    request: web::Json<ResendOtpRequest>,
) -> HttpResponse
where
    R: AccountRepository,
    M: Mailer,
{
    if let Err(errors) = request.validate() {
        return validation_error_response(&errors);
    }

    match state.auth_service.resend_otp(&request.email).await {
        Ok(()) => HttpResponse::Ok().json(ApiResponse::success(MessageResponse::new(
            "A new verification code has been sent to your email",
        ))),
        Err(err) => error_response(&err),
    }
}
