//! Authentication route handlers, one per endpoint.

pub mod forgot_password;
pub mod login;
pub mod logout;
pub mod refresh;
pub mod resend_otp;
pub mod reset_password;
pub mod signup;
pub mod two_factor;
pub mod update_password;
pub mod verify_email;
