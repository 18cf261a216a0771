//! POST /api/v1/auth/verify-email

use actix_web::{web, HttpResponse};
use validator::Validate;

use fd_core::repositories::AccountRepository;
use fd_core::services::Mailer;
use fd_shared::types::ApiResponse;

use crate::app::AppState;
use crate::dto::auth::{AccountResponse, VerifyEmailRequest};
use crate::handlers::{error_response, validation_error_response};

/// Confirms ownership of a signup email with the 6-digit code
pub async fn verify_email<R, M>(
    state: web::Data<AppState<R, M>>,
    request: web::Json<VerifyEmailRequest>,
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
        .verify_email(&request.email, &request.code)
        .await
    {
        Ok(account) => {
            HttpResponse::Ok().json(ApiResponse::success(AccountResponse::from(&account)))
        }
        Err(err) => error_response(&err),
    }
}
