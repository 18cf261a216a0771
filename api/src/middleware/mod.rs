//! Request-layer middleware and guards.

pub mod auth;

pub use auth::{client_ip, extract_access_token, require_account, user_agent};
