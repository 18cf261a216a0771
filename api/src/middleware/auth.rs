//! Access-token guard for protected routes.
//!
//! The token arrives either as a `Bearer` authorization header or as the
//! access cookie. The guard resolves it to a live account, rejecting
//! inactive accounts and tokens minted before the last password change.

use actix_web::http::header;
use actix_web::HttpRequest;

use fd_core::domain::entities::account::Account;
use fd_core::errors::{DomainError, TokenError};
use fd_core::repositories::AccountRepository;
use fd_core::services::Mailer;

use crate::app::AppState;
use crate::cookies::ACCESS_COOKIE;

/// Pulls the access token from the authorization header or the cookie
pub fn extract_access_token(req: &HttpRequest) -> Option<String> {
    let from_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_string);

    from_header.or_else(|| req.cookie(ACCESS_COOKIE).map(|c| c.value().to_string()))
}

/// Resolves the request to its authenticated account or fails with a
/// token/auth error for the handler to map
pub async fn require_account<R, M>(
    req: &HttpRequest,
    state: &AppState<R, M>,
) -> Result<Account, DomainError>
where
    R: AccountRepository,
    M: Mailer,
{
    let token =
        extract_access_token(req).ok_or(DomainError::Token(TokenError::Missing))?;
    state.auth_service.authorize_access(&token).await
}

/// Client address recorded on new sessions
pub fn client_ip(req: &HttpRequest) -> String {
    req.connection_info()
        .realip_remote_addr()
        .unwrap_or("unknown")
        .to_string()
}

/// User-agent string recorded on new sessions
pub fn user_agent(req: &HttpRequest) -> String {
    req.headers()
        .get(header::USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown")
        .to_string()
}
