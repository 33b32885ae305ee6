use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Server-side record backing one signed-in client.
///
/// A token triple is only honoured while a session exists for its `client`
/// and the token's id matches `token_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub client: String,
    pub user_id: Uuid,
    pub token_id: Uuid,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl AuthSession {
    pub fn new(client: String, user_id: Uuid, token_id: Uuid, expires_at: DateTime<Utc>) -> Self {
        Self {
            client,
            user_id,
            token_id,
            expires_at,
            created_at: Utc::now(),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}
