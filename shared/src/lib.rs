//! # FoodyDrop Shared
//!
//! Configuration types and common response envelopes shared across the
//! FoodyDrop backend crates.

pub mod config;
pub mod types;
