//! Authentication orchestrator: signup, login, verification, token refresh,
//! password reset, and session management.

mod config;
mod service;

#[cfg(test)]
mod tests;

pub use config::{AuthConfig, TwoFactorPolicy};
pub use service::AuthService;
