//! Hashed password-reset tickets.

use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Time-to-live for a reset ticket
pub const RESET_TICKET_TTL_MINUTES: i64 = 15;

/// Entropy of the plaintext token in bytes
const TOKEN_BYTES: usize = 32;

/// A one-time, expiring password-reset credential.
///
/// The plaintext token is handed out exactly once (embedded in the reset
/// link) and never persisted; only its SHA-256 hash is stored and compared,
/// so a database leak does not yield usable reset links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordResetTicket {
    /// SHA-256 hash (hex) of the plaintext token
    pub token_hash: String,

    /// Instant after which the ticket can no longer be redeemed
    pub expires_at: DateTime<Utc>,
}

impl PasswordResetTicket {
    /// Issues a fresh ticket, returning the stored form and the plaintext
    /// token for delivery.
    pub fn issue(now: DateTime<Utc>) -> (Self, String) {
        let mut bytes = [0u8; TOKEN_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);
        let plaintext = hex::encode(bytes);

        let ticket = Self {
            token_hash: Self::hash_token(&plaintext),
            expires_at: now + Duration::minutes(RESET_TICKET_TTL_MINUTES),
        };
        (ticket, plaintext)
    }

    /// One-way hash used for storage and comparison
    pub fn hash_token(plaintext: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(plaintext.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Checks whether a presented plaintext token matches this ticket
    pub fn matches(&self, plaintext: &str) -> bool {
        self.token_hash == Self::hash_token(plaintext)
    }

    /// Checks whether the ticket has expired at `now`
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}
