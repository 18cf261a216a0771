//! Account lifecycle routes.

use actix_web::{web, HttpRequest, HttpResponse};

use fd_core::repositories::AccountRepository;
use fd_core::services::Mailer;

use crate::app::AppState;
use crate::cookies::removal_cookies;
use crate::handlers::error_response;
use crate::middleware::require_account;

/// Handler for DELETE /api/v1/account
///
/// Soft-deactivates the authenticated account and revokes every session.
/// The record is kept for audit; the email stays reserved.
pub async fn deactivate<R, M>(req: HttpRequest, state: web::Data<AppState<R, M>>) -> HttpResponse
where
    R: AccountRepository,
    M: Mailer,
{
    let account = match require_account(&req, &state).await {
        Ok(account) => account,
        Err(err) => return error_response(&err),
    };

    match state.auth_service.deactivate_account(account.id).await {
        Ok(()) => {
            let [access, refresh] = removal_cookies();
            HttpResponse::NoContent().cookie(access).cookie(refresh).finish()
        }
        Err(err) => error_response(&err),
    }
}
