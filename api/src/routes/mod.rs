//! Route registration.

pub mod account;
pub mod auth;
pub mod sessions;

use actix_web::web;

use fd_core::repositories::AccountRepository;
use fd_core::services::Mailer;

/// Registers the identity and session surface under /api/v1
pub fn configure<R, M>(cfg: &mut web::ServiceConfig)
where
    R: AccountRepository + 'static,
    M: Mailer + 'static,
{
    cfg.service(
        web::scope("/api/v1/auth")
            .route("/signup", web::post().to(auth::signup::signup::<R, M>))
            .route("/login", web::post().to(auth::login::login::<R, M>))
            .route(
                "/two-factor",
                web::post().to(auth::two_factor::verify_two_factor::<R, M>),
            )
            .route(
                "/verify-email",
                web::post().to(auth::verify_email::verify_email::<R, M>),
            )
            .route(
                "/resend-otp",
                web::post().to(auth::resend_otp::resend_otp::<R, M>),
            )
            .route(
                "/forgot-password",
                web::post().to(auth::forgot_password::forgot_password::<R, M>),
            )
            .route(
                "/reset-password",
                web::post().to(auth::reset_password::reset_password::<R, M>),
            )
            .route(
                "/update-password",
                web::patch().to(auth::update_password::update_password::<R, M>),
            )
            .route("/refresh", web::post().to(auth::refresh::refresh::<R, M>))
            .route("/logout", web::post().to(auth::logout::logout::<R, M>)),
    )
    .service(
        web::scope("/api/v1/sessions")
            .route("", web::get().to(sessions::list_sessions::<R, M>))
            .route("", web::delete().to(sessions::revoke_all_sessions::<R, M>))
            .route("/{id}", web::get().to(sessions::get_session::<R, M>))
            .route("/{id}", web::delete().to(sessions::revoke_session::<R, M>)),
    )
    .service(
        web::scope("/api/v1/account")
            .route("", web::delete().to(account::deactivate::<R, M>)),
    );
}
