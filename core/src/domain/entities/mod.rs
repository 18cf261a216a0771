//! Domain entities for identity and session lifecycle management.

pub mod account;
pub mod one_time_code;
pub mod reset_ticket;
pub mod session;
pub mod token;

pub use account::{Account, AccountRole};
pub use one_time_code::{CodeError, OneTimeCode, OtpPurpose};
pub use reset_ticket::PasswordResetTicket;
pub use session::{Session, SessionError, SessionSet, MAX_SESSIONS_PER_ACCOUNT};
pub use token::{Claims, TokenPair};
