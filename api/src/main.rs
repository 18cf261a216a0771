//! FoodyDrop identity service binary.
//!
//! Wires the MySQL repository and email dispatcher into the auth service
//! and serves the HTTP API.

use std::env;
use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpServer};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use fd_api::routes;
use fd_api::{app, AppState};
use fd_core::services::{AuthConfig, AuthService, PasswordHasher, SystemClock, TokenService, TwoFactorPolicy};
use fd_infra::database::{create_pool, MySqlAccountRepository};
use fd_infra::email::{create_mailer, EmailDispatcher};
use fd_shared::config::{CookieConfig, DatabaseConfig, Environment, JwtConfig, ServerConfig};

fn jwt_config_from_env() -> JwtConfig {
    let defaults = JwtConfig::default();
    JwtConfig {
        access_secret: env::var("JWT_ACCESS_SECRET").unwrap_or(defaults.access_secret),
        refresh_secret: env::var("JWT_REFRESH_SECRET").unwrap_or(defaults.refresh_secret),
        access_token_expiry_minutes: env::var("JWT_ACCESS_EXPIRY_MINUTES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.access_token_expiry_minutes),
        refresh_token_expiry_days: env::var("JWT_REFRESH_EXPIRY_DAYS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.refresh_token_expiry_days),
        issuer: defaults.issuer,
    }
}

fn two_factor_policy_from_env() -> TwoFactorPolicy {
    match env::var("TWO_FACTOR_POLICY").as_deref() {
        Ok("admin-only") => TwoFactorPolicy::AdminOnly,
        _ => TwoFactorPolicy::Disabled,
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let environment = Environment::from_env();
    let server_config = ServerConfig::from_env();
    let database_config = DatabaseConfig::from_env();
    let jwt_config = jwt_config_from_env();

    if environment.is_production() && jwt_config.is_using_default_secret() {
        warn!("JWT signing secrets are default placeholders in production");
    }

    let pool = create_pool(&database_config).await?;
    let repository = Arc::new(MySqlAccountRepository::new(pool));
    let mailer = Arc::new(create_mailer()?);
    let tokens = Arc::new(TokenService::new(jwt_config.into()));

    let auth_config = AuthConfig {
        two_factor: two_factor_policy_from_env(),
        ..AuthConfig::default()
    };

    let auth_service = Arc::new(AuthService::new(
        repository,
        mailer,
        tokens,
        PasswordHasher::default(),
        Arc::new(SystemClock),
        auth_config,
    ));

    let cookies = CookieConfig::for_environment(environment);
    let bind_address = server_config.bind_address();
    info!(%environment, %bind_address, "starting server");

    let mut server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(web::Data::new(AppState::new(
                Arc::clone(&auth_service),
                cookies,
            )))
            .configure(app::configure_health)
            .configure(routes::configure::<MySqlAccountRepository, EmailDispatcher>)
    })
    .bind(&bind_address)?;

    if server_config.workers > 0 {
        server = server.workers(server_config.workers);
    }

    server.run().await?;
    Ok(())
}
