//! # FoodyDrop API
//!
//! HTTP surface for the identity and session core: DTOs, route handlers,
//! cookie issuance, the access-token guard, and the error-to-HTTP mapping.

pub mod app;
pub mod cookies;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;

pub use app::AppState;
