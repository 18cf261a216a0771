//! Shared application state and health endpoint.

use std::sync::Arc;

use actix_web::{web, HttpResponse};

use fd_core::repositories::AccountRepository;
use fd_core::services::{AuthService, Mailer};
use fd_shared::config::CookieConfig;
use fd_shared::types::ApiResponse;

/// Application state shared across handlers
pub struct AppState<R, M>
where
    R: AccountRepository,
    M: Mailer,
{
    /// The auth orchestrator; the only core entry point the handlers use
    pub auth_service: Arc<AuthService<R, M>>,
    /// Environment-conditioned cookie flags
    pub cookies: CookieConfig,
}

impl<R, M> AppState<R, M>
where
    R: AccountRepository,
    M: Mailer,
{
    pub fn new(auth_service: Arc<AuthService<R, M>>, cookies: CookieConfig) -> Self {
        Self {
            auth_service,
            cookies,
        }
    }
}

/// Handler for GET /health
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::success("ok"))
}

/// Registers the health route
pub fn configure_health(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check));
}
