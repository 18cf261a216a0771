//! Configuration modules for the FoodyDrop backend

pub mod auth;
pub mod database;
pub mod environment;
pub mod server;

pub use auth::{CookieConfig, JwtConfig};
pub use database::DatabaseConfig;
pub use environment::Environment;
pub use server::ServerConfig;
