//! Common types shared across crates

pub mod response;

pub use response::ApiResponse;
