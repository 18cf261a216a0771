//! POST /api/v1/auth/two-factor

use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use fd_core::repositories::AccountRepository;
use fd_core::services::Mailer;
use fd_shared::types::ApiResponse;

use crate::app::AppState;
use crate::cookies::{access_cookie, refresh_cookie};
use crate::dto::auth::{AuthResponse, TwoFactorRequest};
use crate::handlers::{error_response, validation_error_response};
use crate::middleware::{client_ip, user_agent};

/// Completes a two-factor login with the emailed code.
///
/// The password is re-verified so a leaked code alone is never enough to
/// obtain tokens.
pub async fn verify_two_factor<R, M>(
    req: HttpRequest,
    state: web::Data<AppState<R, M>>,
    request: web::Json<TwoFactorRequest>,
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
        .verify_two_factor(&request.email, &request.password, &request.code, &ip, &agent)
        .await
    {
        Ok(auth) => HttpResponse::Ok()
            .cookie(access_cookie(&auth.tokens, &state.cookies))
            .cookie(refresh_cookie(&auth.tokens, &state.cookies))
            .json(ApiResponse::success(AuthResponse::from(&auth))),
        Err(err) => error_response(&err),
    }
}
