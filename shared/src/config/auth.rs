//! Authentication and cookie configuration

use serde::{Deserialize, Serialize};

use super::environment::Environment;

/// JWT signing configuration
///
/// Access and refresh tokens are signed with two independent secrets so a
/// leaked access secret cannot be used to forge refresh tokens.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// Secret key for signing access tokens
    pub access_secret: String,

    /// Secret key for signing refresh tokens
    pub refresh_secret: String,

    /// Access token expiry in minutes
    pub access_token_expiry_minutes: i64,

    /// Refresh token expiry in days
    pub refresh_token_expiry_days: i64,

    /// JWT issuer claim
    pub issuer: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            access_secret: String::from("access-secret-change-in-production"),
            refresh_secret: String::from("refresh-secret-change-in-production"),
            access_token_expiry_minutes: 15,
            refresh_token_expiry_days: 7,
            issuer: String::from("foodydrop"),
        }
    }
}

impl JwtConfig {
    /// Access token lifetime in seconds, as sent to clients
    pub fn access_expiry_seconds(&self) -> i64 {
        self.access_token_expiry_minutes * 60
    }

    /// Refresh token lifetime in seconds, as sent to clients
    pub fn refresh_expiry_seconds(&self) -> i64 {
        self.refresh_token_expiry_days * 24 * 60 * 60
    }

    /// Check if either signing secret is still a default placeholder
    pub fn is_using_default_secret(&self) -> bool {
        self.access_secret.ends_with("change-in-production")
            || self.refresh_secret.ends_with("change-in-production")
    }
}

/// Cookie attributes for the token pair
///
/// Both bearer cookies are always http-only; `secure` and the SameSite level
/// are conditioned on the deployment environment.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct CookieConfig {
    /// Send cookies over HTTPS only
    pub secure: bool,

    /// Use SameSite=Strict (Lax in development so local tooling works)
    pub same_site_strict: bool,
}

impl CookieConfig {
    /// Derive cookie flags from the deployment environment
    pub fn for_environment(env: Environment) -> Self {
        Self {
            secure: env.is_production(),
            same_site_strict: env.is_production(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry_seconds() {
        let config = JwtConfig::default();
        assert_eq!(config.access_expiry_seconds(), 15 * 60);
        assert_eq!(config.refresh_expiry_seconds(), 7 * 24 * 60 * 60);
    }

    #[test]
    fn test_default_secret_detection() {
        let mut config = JwtConfig::default();
        assert!(config.is_using_default_secret());

        config.access_secret = String::from("a-real-secret");
        config.refresh_secret = String::from("another-real-secret");
        assert!(!config.is_using_default_secret());
    }

    #[test]
    fn test_cookie_flags_follow_environment() {
        let dev = CookieConfig::for_environment(Environment::Development);
        assert!(!dev.secure);
        assert!(!dev.same_site_strict);

        let prod = CookieConfig::for_environment(Environment::Production);
        assert!(prod.secure);
        assert!(prod.same_site_strict);
    }
}
