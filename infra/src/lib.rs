//! # Infrastructure Layer
//!
//! Concrete implementations of the core's external collaborators:
//! MySQL account persistence (SQLx) and outbound email dispatch
//! (SendGrid HTTP API, plus a mock dispatcher for development and tests).

use thiserror::Error;

pub mod database;
pub mod email;

/// Infrastructure-level failures, converted to domain errors at the
/// collaborator boundary
#[derive(Error, Debug)]
pub enum InfrastructureError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Email dispatch error: {0}")]
    Email(String),
}
