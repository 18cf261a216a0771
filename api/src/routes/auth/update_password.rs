//! PATCH /api/v1/auth/update-password

use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use fd_core::repositories::AccountRepository;
use fd_core::services::Mailer;
use fd_shared::types::ApiResponse;

use crate::app::AppState;
use crate::cookies::{access_cookie, refresh_cookie};
use crate::dto::auth::{AuthResponse, UpdatePasswordRequest};
use crate::handlers::{error_response, validation_error_response};
use crate::middleware::{client_ip, require_account, user_agent};

/// Changes the password of the authenticated account.
///
/// Other sessions stay active, but access tokens minted before the change
/// stop working. A fresh token pair is issued for this device, replacing
/// the cookies.
pub async fn update_password<R, M>(
    req: HttpRequest,
    state: web::Data<AppState<R, M>>,
    request: web::Json<UpdatePasswordRequest>,
) -> HttpResponse
where
    R: AccountRepository,
    M: Mailer,
{
    let account = match require_account(&req, &state).await {
        Ok(account) => account,
        Err(err) => return error_response(&err),
    };

    if let Err(errors) = request.validate() {
        return validation_error_response(&errors);
    }

    let ip = client_ip(&req);
    let agent = user_agent(&req);

    match state
        .auth_service
        .update_password(
            account.id,
            &request.current_password,
            &request.password,
            &request.password_confirmation,
            &ip,
            &agent,
        )
        .await
    {
        Ok(auth) => HttpResponse::Ok()
            .cookie(access_cookie(&auth.tokens, &state.cookies))
            .cookie(refresh_cookie(&auth.tokens, &state.cookies))
            .json(ApiResponse::success(AuthResponse::from(&auth))),
        Err(err) => error_response(&err),
    }
}
