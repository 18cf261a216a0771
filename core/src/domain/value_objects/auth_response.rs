//! Authentication flow results handed to the request layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::account::{Account, AccountRole};
use crate::domain::entities::session::Session;
use crate::domain::entities::token::TokenPair;

/// Result of a completed authentication (login, 2FA completion, refresh)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedAccount {
    /// Account identifier
    pub account_id: Uuid,

    /// Display name
    pub name: String,

    /// Login email
    pub email: String,

    /// Role for downstream capability checks (enforced by the request layer)
    pub role: AccountRole,

    /// Freshly minted token pair; the API layer turns these into cookies
    pub tokens: TokenPair,
}

impl AuthenticatedAccount {
    /// Builds the response from an account and a minted token pair
    pub fn new(account: &Account, tokens: TokenPair) -> Self {
        Self {
            account_id: account.id,
            name: account.name.clone(),
            email: account.email.clone(),
            role: account.role,
            tokens,
        }
    }
}

/// Outcome of a login attempt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LoginOutcome {
    /// Credentials accepted; tokens issued and session recorded
    Authenticated(AuthenticatedAccount),
    /// Credentials accepted but a two-factor code was dispatched; no tokens
    /// are issued until `verify_two_factor` completes
    TwoFactorPending,
}

/// Session metadata exposed to the owning account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionView {
    /// Session identifier (used for revocation)
    pub id: Uuid,

    /// Originating IP address
    pub ip: String,

    /// Device user-agent
    pub user_agent: String,

    /// Login instant
    pub created_at: DateTime<Utc>,

    /// Last rotation instant
    pub updated_at: DateTime<Utc>,
}

impl From<&Session> for SessionView {
    fn from(session: &Session) -> Self {
        Self {
            id: session.id,
            ip: session.ip.clone(),
            user_agent: session.user_agent.clone(),
            created_at: session.created_at,
            updated_at: session.updated_at,
        }
    }
}
