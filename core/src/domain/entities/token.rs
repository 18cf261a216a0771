//! Token claims and the token pair handed to clients.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims structure for JWT payloads.
///
/// Both token kinds carry the same claim shape; they differ only in TTL and
/// signing secret. The random `jti` makes every encoded token distinct, so a
/// session's refresh-token value is unique process-wide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (account ID)
    pub sub: String,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// Not before timestamp
    pub nbf: i64,

    /// Issuer
    pub iss: String,

    /// JWT ID (unique identifier for the token)
    pub jti: String,
}

impl Claims {
    /// Creates claims for an account with the given lifetime
    pub fn new(account_id: Uuid, ttl: Duration, issuer: &str, now: DateTime<Utc>) -> Self {
        Self {
            sub: account_id.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            nbf: now.timestamp(),
            iss: issuer.to_string(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// Checks if the claims have expired at `now`
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }

    /// Parses the subject back into an account ID
    pub fn account_id(&self) -> Result<Uuid, uuid::Error> {
        Uuid::parse_str(&self.sub)
    }

    /// Issued-at as a timestamp, for comparison with password-changed-at
    pub fn issued_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.iat, 0).unwrap_or_else(Utc::now)
    }
}

/// Token pair returned to the client (and set as cookies by the API layer)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// Short-lived access token
    pub access_token: String,

    /// Long-lived refresh token; also the session identity key
    pub refresh_token: String,

    /// Access token lifetime in seconds
    pub access_expires_in: i64,

    /// Refresh token lifetime in seconds
    pub refresh_expires_in: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_carry_subject_and_issuer() {
        let account_id = Uuid::new_v4();
        let now = Utc::now();
        let claims = Claims::new(account_id, Duration::minutes(15), "foodydrop", now);

        assert_eq!(claims.sub, account_id.to_string());
        assert_eq!(claims.iss, "foodydrop");
        assert_eq!(claims.account_id().unwrap(), account_id);
        assert_eq!(claims.exp - claims.iat, 15 * 60);
        assert!(!claims.is_expired(now));
    }

    #[test]
    fn test_claims_expiry() {
        let now = Utc::now();
        let claims = Claims::new(Uuid::new_v4(), Duration::minutes(1), "foodydrop", now);
        assert!(claims.is_expired(now + Duration::minutes(2)));
    }

    #[test]
    fn test_jti_unique_per_token() {
        let now = Utc::now();
        let id = Uuid::new_v4();
        let a = Claims::new(id, Duration::days(7), "foodydrop", now);
        let b = Claims::new(id, Duration::days(7), "foodydrop", now);
        assert_ne!(a.jti, b.jti);
    }

    #[test]
    fn test_issued_at_round_trip() {
        let now = Utc::now();
        let claims = Claims::new(Uuid::new_v4(), Duration::minutes(15), "foodydrop", now);
        assert_eq!(claims.issued_at().timestamp(), now.timestamp());
    }
}
