//! Repository interfaces and test doubles.

pub mod account;

pub use account::{AccountRepository, MockAccountRepository};
