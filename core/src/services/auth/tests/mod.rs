//! Auth service test suite.

mod mocks;
mod session_tests;
