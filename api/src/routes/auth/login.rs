//! POST /api/v1/auth/login

use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use fd_core::domain::value_objects::LoginOutcome;
use fd_core::repositories::AccountRepository;
use fd_core::services::Mailer;
use fd_shared::types::ApiResponse;

use crate::app::AppState;
use crate::cookies::{access_cookie, refresh_cookie};
use crate::dto::auth::{AuthResponse, LoginRequest, TwoFactorPendingResponse};
use crate::handlers::{error_response, validation_error_response};
use crate::middleware::{client_ip, user_agent};

/// Authenticates with email and password.
///
/// On success the token pair travels both in the body and as http-only
/// cookies. When the two-factor policy applies to the account, no tokens
/// are issued and the response asks for the emailed code instead.
pub async fn login<R, M>(
    req: HttpRequest,
    state: web::Data<AppState<R, M>>,
    request: web::Json<LoginRequest>,
) -> HttpResponse
where
    R: AccountRepository,
    M: Mailer,
{
    if let Err(errors) = request.validate() {
        return validation_error_response(&errors);
    }

    let ip = client_ip(&req);
    let agent = user_agent(&req);

    match state
        .auth_service
        .login(&request.email, &request.password, &ip, &agent)
        .await
    {
        Ok(LoginOutcome::Authenticated(auth)) => HttpResponse::Ok()
            .cookie(access_cookie(&auth.tokens, &state.cookies))
            .cookie(refresh_cookie(&auth.tokens, &state.cookies))
            .json(ApiResponse::success(AuthResponse::from(&auth))),
        Ok(LoginOutcome::TwoFactorPending) => {
            HttpResponse::Ok().json(ApiResponse::success(TwoFactorPendingResponse {
                two_factor_required: true,
                message: "A verification code has been sent to your email".to_string(),
            }))
        }
        Err(err) => error_response(&err),
    }
}
