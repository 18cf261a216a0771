//! POST /api/v1/auth/logout

use actix_web::{web, HttpRequest, HttpResponse};
use tracing::debug;

use fd_core::repositories::AccountRepository;
use fd_core::services::Mailer;
use fd_shared::types::ApiResponse;

use crate::app::AppState;
use crate::cookies::{removal_cookies, REFRESH_COOKIE};
use crate::dto::auth::MessageResponse;

/// Ends the current session.
///
/// Always answers 200 and clears both cookies: a missing, expired, or
/// already-revoked refresh token still leaves the client logged out.
pub async fn logout<R, M>(req: HttpRequest, state: web::Data<AppState<R, M>>) -> HttpResponse
where
    R: AccountRepository,
    M: Mailer,
{
    if let Some(cookie) = req.cookie(REFRESH_COOKIE) {
        if let Err(err) = state.auth_service.logout(cookie.value()).await {
            debug!(error = %err, "logout without a live session");
        }
    }

    let [access, refresh] = removal_cookies();
    HttpResponse::Ok()
        .cookie(access)
        .cookie(refresh)
        .json(ApiResponse::success(MessageResponse::new("Logged out")))
}
