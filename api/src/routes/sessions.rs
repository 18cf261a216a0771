//! Session introspection and revocation for the authenticated account.
//!
//! Unknown session ids answer 404 here, unlike the auth routes where a
//! missing session is an authentication failure.

use actix_web::{web, HttpRequest, HttpResponse};
use uuid::Uuid;

use fd_core::errors::{AuthError, DomainError};
use fd_core::repositories::AccountRepository;
use fd_core::services::Mailer;
use fd_shared::types::ApiResponse;

use crate::app::AppState;
use crate::dto::session::{RevokeAllResponse, SessionListItem, SessionResponse};
use crate::handlers::error_response;
use crate::middleware::require_account;

fn session_error_response(err: &DomainError) -> HttpResponse {
    match err {
        DomainError::Auth(AuthError::SessionNotFound) => {
            HttpResponse::NotFound().json(ApiResponse::<()>::error("Session not found"))
        }
        other => error_response(other),
    }
}

/// Handler for GET /api/v1/sessions
pub async fn list_sessions<R, M>(
    req: HttpRequest,
    state: web::Data<AppState<R, M>>,
) -> HttpResponse
where
    R: AccountRepository,
    M: Mailer,
{
    let account = match require_account(&req, &state).await {
        Ok(account) => account,
        Err(err) => return error_response(&err),
    };

    match state.auth_service.list_sessions(account.id).await {
        Ok(sessions) => {
            let views: Vec<SessionListItem> =
                sessions.iter().map(SessionListItem::from).collect();
            HttpResponse::Ok().json(ApiResponse::success(views))
        }
        Err(err) => session_error_response(&err),
    }
}

/// Handler for GET /api/v1/sessions/{id}
pub async fn get_session<R, M>(
    req: HttpRequest,
    state: web::Data<AppState<R, M>>,
    path: web::Path<Uuid>,
) -> HttpResponse
where
    R: AccountRepository,
    M: Mailer,
{
    let account = match require_account(&req, &state).await {
        Ok(account) => account,
        Err(err) => return error_response(&err),
    };

    match state
        .auth_service
        .get_session(account.id, path.into_inner())
        .await
    {
        Ok(session) => {
            HttpResponse::Ok().json(ApiResponse::success(SessionResponse::from(&session)))
        }
        Err(err) => session_error_response(&err),
    }
}

/// Handler for DELETE /api/v1/sessions/{id}
pub async fn revoke_session<R, M>(
    req: HttpRequest,
    state: web::Data<AppState<R, M>>,
    path: web::Path<Uuid>,
) -> HttpResponse
where
    R: AccountRepository,
    M: Mailer,
{
    let account = match require_account(&req, &state).await {
        Ok(account) => account,
        Err(err) => return error_response(&err),
    };

    match state
        .auth_service
        .revoke_session(account.id, path.into_inner())
        .await
    {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => session_error_response(&err),
    }
}

/// Handler for DELETE /api/v1/sessions
pub async fn revoke_all_sessions<R, M>(
    req: HttpRequest,
    state: web::Data<AppState<R, M>>,
) -> HttpResponse
where
    R: AccountRepository,
    M: Mailer,
{
    let account = match require_account(&req, &state).await {
        Ok(account) => account,
        Err(err) => return error_response(&err),
    };

    match state.auth_service.revoke_all_sessions(account.id).await {
        Ok(revoked) => {
            HttpResponse::Ok().json(ApiResponse::success(RevokeAllResponse { revoked }))
        }
        Err(err) => session_error_response(&err),
    }
}
