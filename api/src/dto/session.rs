//! Session introspection DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use fd_core::domain::value_objects::SessionView;

/// List entry for an active session; the rotation instant is only exposed
/// on the single-session get
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionListItem {
    pub id: Uuid,
    pub ip: String,
    pub user_agent: String,
    pub created_at: DateTime<Utc>,
}

impl From<&SessionView> for SessionListItem {
    fn from(view: &SessionView) -> Self {
        Self {
            id: view.id,
            ip: view.ip.clone(),
            user_agent: view.user_agent.clone(),
            created_at: view.created_at,
        }
    }
}

/// Full view of one session, as shown to its owning account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub id: Uuid,
    pub ip: String,
    pub user_agent: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&SessionView> for SessionResponse {
    fn from(view: &SessionView) -> Self {
        Self {
            id: view.id,
            ip: view.ip.clone(),
            user_agent: view.user_agent.clone(),
            created_at: view.created_at,
            updated_at: view.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevokeAllResponse {
    pub revoked: usize,
}
