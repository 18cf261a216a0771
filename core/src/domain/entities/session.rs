//! Per-device sessions and the bounded per-account session collection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Maximum number of concurrent sessions an account may hold
pub const MAX_SESSIONS_PER_ACCOUNT: usize = 5;

/// Failure modes of session collection operations
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    #[error("maximum number of active sessions reached")]
    CapReached,
    #[error("session not found")]
    NotFound,
}

/// One authenticated device: a refresh-token value bound to connection
/// metadata. The unit of revocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Opaque session identifier
    pub id: Uuid,

    /// Current refresh-token value; only this value is valid for rotation
    pub refresh_token: String,

    /// Originating IP address at login
    pub ip: String,

    /// User-agent string at login
    pub user_agent: String,

    /// When the session was created (login instant)
    pub created_at: DateTime<Utc>,

    /// Bumped on every rotation
    pub updated_at: DateTime<Utc>,
}

impl Session {
    /// Creates a new session for a freshly issued refresh token
    pub fn new(refresh_token: String, ip: String, user_agent: String, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            refresh_token,
            ip,
            user_agent,
            created_at: now,
            updated_at: now,
        }
    }

    /// Swaps the refresh-token value in place, preserving identity and
    /// connection metadata
    fn rotate(&mut self, new_token: String, now: DateTime<Utc>) {
        self.refresh_token = new_token;
        self.updated_at = now;
    }
}

/// Ordered collection of an account's active sessions.
///
/// Membership in this collection is the source of truth for refresh-token
/// validity: a token that passes signature verification but has no matching
/// session here is dead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionSet(Vec<Session>);

impl SessionSet {
    /// Number of active sessions
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no session is active
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether another session may be added without exceeding the cap
    pub fn has_capacity(&self) -> bool {
        self.0.len() < MAX_SESSIONS_PER_ACCOUNT
    }

    /// Iterate over sessions in login order
    pub fn iter(&self) -> impl Iterator<Item = &Session> {
        self.0.iter()
    }

    /// Look up a session by identifier
    pub fn get(&self, id: Uuid) -> Option<&Session> {
        self.0.iter().find(|s| s.id == id)
    }

    /// Appends a session, enforcing the per-account cap.
    ///
    /// Fails without mutating the collection when the cap is reached;
    /// callers must check capacity before minting tokens so a rejection
    /// never leaves an orphaned refresh token.
    pub fn add(&mut self, session: Session) -> Result<(), SessionError> {
        if !self.has_capacity() {
            return Err(SessionError::CapReached);
        }
        self.0.push(session);
        Ok(())
    }

    /// Rotates the session currently holding `old_token` to `new_token`.
    ///
    /// Fails with `NotFound` when no session holds the old value: either the
    /// token was already rotated or revoked (replay), or it was forged with
    /// a valid signature but a stale value. The old value becomes permanently
    /// invalid on success.
    pub fn rotate(
        &mut self,
        old_token: &str,
        new_token: String,
        now: DateTime<Utc>,
    ) -> Result<Uuid, SessionError> {
        let session = self
            .0
            .iter_mut()
            .find(|s| s.refresh_token == old_token)
            .ok_or(SessionError::NotFound)?;
        session.rotate(new_token, now);
        Ok(session.id)
    }

    /// Removes the session with the given identifier
    pub fn remove(&mut self, id: Uuid) -> Result<(), SessionError> {
        let before = self.0.len();
        self.0.retain(|s| s.id != id);
        if self.0.len() == before {
            return Err(SessionError::NotFound);
        }
        Ok(())
    }

    /// Removes the session holding the given refresh-token value
    pub fn remove_by_token(&mut self, token: &str) -> Result<(), SessionError> {
        let before = self.0.len();
        self.0.retain(|s| s.refresh_token != token);
        if self.0.len() == before {
            return Err(SessionError::NotFound);
        }
        Ok(())
    }

    /// Revokes every session; every outstanding refresh token dies with them
    pub fn clear(&mut self) {
        self.0.clear();
    }
}
