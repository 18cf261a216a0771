//! Domain services: credential hashing, token issuance, mail dispatch, and
//! the authentication orchestrator that composes them.

pub mod auth;
pub mod clock;
pub mod mail;
pub mod password;
pub mod token;

pub use auth::{AuthConfig, AuthService, TwoFactorPolicy};
pub use clock::{Clock, FixedClock, SystemClock};
pub use mail::{mask_email, Mailer};
pub use password::PasswordHasher;
pub use token::{TokenConfig, TokenService};
