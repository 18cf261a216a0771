//! POST /api/v1/auth/refresh

use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;

use fd_core::errors::{DomainError, TokenError};
use fd_core::repositories::AccountRepository;
use fd_core::services::Mailer;
use fd_shared::types::ApiResponse;

use crate::app::AppState;
use crate::cookies::{access_cookie, refresh_cookie, REFRESH_COOKIE};
use crate::dto::auth::AuthResponse;
use crate::handlers::error_response;

/// Optional body for clients that do not use the cookie
#[derive(Debug, Deserialize, Default)]
pub struct RefreshRequest {
    pub refresh_token: Option<String>,
}

/// Rotates the refresh token and mints a fresh pair.
///
/// The presented token is retired whether it comes from the cookie or the
/// body; replaying it afterwards fails.
pub async fn refresh<R, M>(
    req: HttpRequest,
    state: web::Data<AppState<R, M>>,
    request: Option<web::Json<RefreshRequest>>,
) -> HttpResponse
where
    R: AccountRepository,
    M: Mailer,
{
    let token = req
        .cookie(REFRESH_COOKIE)
        .map(|c| c.value().to_string())
        .or_else(|| request.and_then(|r| r.into_inner().refresh_token));

    let token = match token {
        Some(token) => token,
        None => return error_response(&DomainError::Token(TokenError::Missing)),
    };

    match state.auth_service.refresh(&token).await {
        Ok(auth) => HttpResponse::Ok()
            .cookie(access_cookie(&auth.tokens, &state.cookies))
            .cookie(refresh_cookie(&auth.tokens, &state.cookies))
            .json(ApiResponse::success(AuthResponse::from(&auth))),
        Err(err) => error_response(&err),
    }
}
