//! Server-side session record

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::user::UserId;

/// Default session lifetime, fixed at creation time. Validation does not
/// extend it (no sliding expiration).
pub const DEFAULT_SESSION_TTL_DAYS: i64 = 7;

const SESSION_TOKEN_LENGTH: usize = 32;

/// A session binding an opaque token to a user for a bounded lifetime
///
/// Owned by the auth repository: created at login/register/refresh, deleted
/// at logout, at rotation, and lazily whenever a lookup observes expiry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    id: String,
    user_id: UserId,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl Session {
    /// Issue a new session for a user with a freshly generated opaque token
    pub fn issue(user_id: UserId, ttl: Duration) -> Self {
        let now = Utc::now();

        Self {
            id: generate_session_token(),
            user_id,
            created_at: now,
            expires_at: now + ttl,
        }
    }

    /// Rebuild a session from storage
    pub fn from_persistence(
        id: String,
        user_id: UserId,
        created_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            created_at,
            expires_at,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Whether the session's lifetime has elapsed
    pub fn is_expired(&self) -> bool {
        self.expires_at < Utc::now()
    }
}

/// Generate an opaque alphanumeric session token
fn generate_session_token() -> String {
    use rand::distributions::Alphanumeric;
    use rand::Rng;

    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SESSION_TOKEN_LENGTH)
        .map(char::from)
        .collect()
}
