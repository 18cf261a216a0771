//! JWT signing and verification for the two token kinds.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::domain::entities::token::{Claims, TokenPair};
use crate::errors::{DomainError, DomainResult, TokenError};

use super::config::TokenConfig;

/// Issues and verifies access and refresh tokens.
///
/// The two kinds share the claim shape but are signed with independent HS256
/// secrets, so a token of one kind never verifies as the other. Verification
/// distinguishes [`TokenError::Expired`] from [`TokenError::Invalid`]: the
/// former means "log in again", the latter means the token was never valid.
pub struct TokenService {
    config: TokenConfig,
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
    validation: Validation,
}

impl TokenService {
    /// Creates a token service from signing configuration
    pub fn new(config: TokenConfig) -> Self {
        let access_encoding = EncodingKey::from_secret(config.access_secret.as_bytes());
        let access_decoding = DecodingKey::from_secret(config.access_secret.as_bytes());
        let refresh_encoding = EncodingKey::from_secret(config.refresh_secret.as_bytes());
        let refresh_decoding = DecodingKey::from_secret(config.refresh_secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.issuer]);
        validation.validate_exp = true;
        validation.validate_nbf = true;

        Self {
            config,
            access_encoding,
            access_decoding,
            refresh_encoding,
            refresh_decoding,
            validation,
        }
    }

    fn access_ttl(&self) -> Duration {
        Duration::minutes(self.config.access_token_expiry_minutes)
    }

    fn refresh_ttl(&self) -> Duration {
        Duration::days(self.config.refresh_token_expiry_days)
    }

    fn encode(&self, claims: &Claims, key: &EncodingKey) -> DomainResult<String> {
        encode(&Header::new(Algorithm::HS256), claims, key)
            .map_err(|_| DomainError::Token(TokenError::GenerationFailed))
    }

    fn decode(&self, token: &str, key: &DecodingKey) -> DomainResult<Claims> {
        decode::<Claims>(token, key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                let err = match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                    _ => TokenError::Invalid,
                };
                DomainError::Token(err)
            })
    }

    /// Signs a short-lived access token for an account
    pub fn sign_access(&self, account_id: Uuid, now: DateTime<Utc>) -> DomainResult<String> {
        let claims = Claims::new(account_id, self.access_ttl(), &self.config.issuer, now);
        self.encode(&claims, &self.access_encoding)
    }

    /// Signs a long-lived refresh token for an account
    pub fn sign_refresh(&self, account_id: Uuid, now: DateTime<Utc>) -> DomainResult<String> {
        let claims = Claims::new(account_id, self.refresh_ttl(), &self.config.issuer, now);
        self.encode(&claims, &self.refresh_encoding)
    }

    /// Verifies an access token and returns its claims
    pub fn verify_access(&self, token: &str) -> DomainResult<Claims> {
        self.decode(token, &self.access_decoding)
    }

    /// Verifies a refresh token and returns its claims.
    ///
    /// Signature validity alone does not make a refresh token usable; the
    /// caller must still match it against the account's session collection.
    pub fn verify_refresh(&self, token: &str) -> DomainResult<Claims> {
        self.decode(token, &self.refresh_decoding)
    }

    /// Mints a fresh access + refresh token pair
    pub fn issue_pair(&self, account_id: Uuid, now: DateTime<Utc>) -> DomainResult<TokenPair> {
        Ok(TokenPair {
            access_token: self.sign_access(account_id, now)?,
            refresh_token: self.sign_refresh(account_id, now)?,
            access_expires_in: self.access_ttl().num_seconds(),
            refresh_expires_in: self.refresh_ttl().num_seconds(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new(TokenConfig::default())
    }

    #[test]
    fn test_access_token_round_trip() {
        let service = service();
        let account_id = Uuid::new_v4();
        let token = service.sign_access(account_id, Utc::now()).unwrap();

        let claims = service.verify_access(&token).unwrap();
        assert_eq!(claims.account_id().unwrap(), account_id);
        assert_eq!(claims.iss, "foodydrop");
    }

    #[test]
    fn test_token_kinds_do_not_cross_verify() {
        let service = service();
        let now = Utc::now();
        let access = service.sign_access(Uuid::new_v4(), now).unwrap();
        let refresh = service.sign_refresh(Uuid::new_v4(), now).unwrap();

        assert!(matches!(
            service.verify_refresh(&access),
            Err(DomainError::Token(TokenError::Invalid))
        ));
        assert!(matches!(
            service.verify_access(&refresh),
            Err(DomainError::Token(TokenError::Invalid))
        ));
    }

    #[test]
    fn test_expired_is_distinguished_from_invalid() {
        let service = service();
        // Signed far enough in the past that the 15-minute TTL has elapsed
        // beyond any validation leeway
        let past = Utc::now() - Duration::hours(1);
        let token = service.sign_access(Uuid::new_v4(), past).unwrap();

        assert!(matches!(
            service.verify_access(&token),
            Err(DomainError::Token(TokenError::Expired))
        ));
        assert!(matches!(
            service.verify_access("not-a-jwt"),
            Err(DomainError::Token(TokenError::Invalid))
        ));
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let service = service();
        let token = service.sign_access(Uuid::new_v4(), Utc::now()).unwrap();

        let other = TokenService::new(TokenConfig {
            access_secret: "a-different-secret".to_string(),
            ..TokenConfig::default()
        });
        assert!(matches!(
            other.verify_access(&token),
            Err(DomainError::Token(TokenError::Invalid))
        ));
    }

    #[test]
    fn test_issue_pair_carries_ttls() {
        let service = service();
        let pair = service.issue_pair(Uuid::new_v4(), Utc::now()).unwrap();

        assert_ne!(pair.access_token, pair.refresh_token);
        assert_eq!(pair.access_expires_in, 15 * 60);
        assert_eq!(pair.refresh_expires_in, 7 * 24 * 60 * 60);
    }

    #[test]
    fn test_refresh_tokens_are_unique_per_mint() {
        let service = service();
        let id = Uuid::new_v4();
        let now = Utc::now();
        let a = service.sign_refresh(id, now).unwrap();
        let b = service.sign_refresh(id, now).unwrap();
        // Random jti keeps every minted token distinct
        assert_ne!(a, b);
    }
}
