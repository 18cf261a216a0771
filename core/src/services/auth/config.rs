//! Auth service configuration.

/// Whether a second factor gates logins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TwoFactorPolicy {
    /// No second factor; every login completes on password alone
    Disabled,
    /// Admin accounts must confirm a short-lived emailed code before tokens
    /// are issued; other roles log in on password alone
    AdminOnly,
}

/// Configuration for the authentication service
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Second-factor policy applied at login
    pub two_factor: TwoFactorPolicy,

    /// Minimum accepted password length
    pub min_password_length: usize,

    /// How many times a read-modify-write cycle is retried when the
    /// conditional repository update loses a version race
    pub update_retries: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            two_factor: TwoFactorPolicy::Disabled,
            min_password_length: 8,
            update_retries: 3,
        }
    }
}
