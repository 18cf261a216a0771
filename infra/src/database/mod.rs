//! MySQL persistence via SQLx.

pub mod mysql;

pub use mysql::MySqlAccountRepository;

use sqlx::mysql::MySqlPoolOptions;
use sqlx::MySqlPool;
use std::time::Duration;

use fd_shared::config::DatabaseConfig;

use crate::InfrastructureError;

/// Creates the MySQL connection pool from configuration
pub async fn create_pool(config: &DatabaseConfig) -> Result<MySqlPool, InfrastructureError> {
    MySqlPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout))
        .connect(&config.url)
        .await
        .map_err(|e| InfrastructureError::Database(format!("failed to connect: {e}")))
}
