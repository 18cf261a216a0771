//! Bearer cookie construction.
//!
//! Both tokens travel as http-only cookies; `Secure` and the SameSite level
//! follow the deployment environment (strict in production, lax in
//! development so local tooling works over plain HTTP).

use actix_web::cookie::time::Duration;
use actix_web::cookie::{Cookie, SameSite};

use fd_core::domain::entities::token::TokenPair;
use fd_shared::config::CookieConfig;

/// Cookie carrying the short-lived access token
pub const ACCESS_COOKIE: &str = "accessToken";
/// Cookie carrying the long-lived refresh token
pub const REFRESH_COOKIE: &str = "refreshToken";

fn same_site(config: &CookieConfig) -> SameSite {
    if config.same_site_strict {
        SameSite::Strict
    } else {
        SameSite::Lax
    }
}

fn bearer_cookie(name: &'static str, value: &str, max_age_secs: i64, config: &CookieConfig) -> Cookie<'static> {
    Cookie::build(name, value.to_string())
        .path("/")
        .http_only(true)
        .secure(config.secure)
        .same_site(same_site(config))
        .max_age(Duration::seconds(max_age_secs))
        .finish()
}

/// Builds the access-token cookie for a minted pair
pub fn access_cookie(tokens: &TokenPair, config: &CookieConfig) -> Cookie<'static> {
    bearer_cookie(ACCESS_COOKIE, &tokens.access_token, tokens.access_expires_in, config)
}

/// Builds the refresh-token cookie for a minted pair
pub fn refresh_cookie(tokens: &TokenPair, config: &CookieConfig) -> Cookie<'static> {
    bearer_cookie(REFRESH_COOKIE, &tokens.refresh_token, tokens.refresh_expires_in, config)
}

/// Expired replacement cookies, set on logout regardless of whether a
/// session matched
pub fn removal_cookies() -> [Cookie<'static>; 2] {
    let mut access = Cookie::new(ACCESS_COOKIE, "");
    access.set_path("/");
    access.make_removal();
    let mut refresh = Cookie::new(REFRESH_COOKIE, "");
    refresh.set_path("/");
    refresh.make_removal();
    [access, refresh]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens() -> TokenPair {
        TokenPair {
            access_token: "access".to_string(),
            refresh_token: "refresh".to_string(),
            access_expires_in: 900,
            refresh_expires_in: 604800,
        }
    }

    #[test]
    fn test_cookies_are_http_only() {
        let config = CookieConfig {
            secure: true,
            same_site_strict: true,
        };
        let cookie = access_cookie(&tokens(), &config);
        assert_eq!(cookie.name(), ACCESS_COOKIE);
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Strict));
        assert_eq!(cookie.max_age(), Some(Duration::seconds(900)));
    }

    #[test]
    fn test_development_flags_are_relaxed() {
        let config = CookieConfig {
            secure: false,
            same_site_strict: false,
        };
        let cookie = refresh_cookie(&tokens(), &config);
        assert_eq!(cookie.secure(), Some(false));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.http_only(), Some(true));
    }

    #[test]
    fn test_removal_cookies_expire_both_names() {
        let [access, refresh] = removal_cookies();
        assert_eq!(access.name(), ACCESS_COOKIE);
        assert_eq!(refresh.name(), REFRESH_COOKIE);
        assert_eq!(access.max_age(), Some(Duration::ZERO));
    }
}
