//! Session Entity
//!
//! Represents an authenticated user session.
//! Stored server-side; the client holds only the signed cookie token.

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::domain::entity::user::{User, UserProjection};
use crate::domain::value_object::{public_id::PublicId, user_id::UserId, user_role::Role};

/// Session entity
///
/// Carries the reduced user projection so that guards never need a second
/// lookup. The password hash is excluded by construction.
#[derive(Debug, Clone)]
pub struct Session {
    /// Session ID (UUID v4)
    pub session_id: Uuid,
    /// Reference to User
    pub user_id: UserId,
    /// Public ID of the user
    pub public_id: PublicId,
    /// Display name snapshot
    pub name: String,
    /// Email snapshot
    pub email: String,
    /// Role at session creation
    pub role: Role,
    /// Session expiration (Unix timestamp ms); fixed TTL, no extension
    pub expires_at_ms: i64,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Create a new session for a user
    ///
    /// TTL is provided by the application layer (config), not hard-coded here.
    pub fn new(user: &User, ttl: Duration) -> Self {
        let now = Utc::now();

        Self {
            session_id: Uuid::new_v4(),
            user_id: user.user_id,
            public_id: user.public_id,
            name: user.name.as_str().to_string(),
            email: user.email.as_str().to_string(),
            role: user.role,
            expires_at_ms: (now + ttl).timestamp_millis(),
            created_at: now,
        }
    }

    /// Check if session has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp_millis() > self.expires_at_ms
    }

    /// The reduced user projection carried by this session
    pub fn projection(&self) -> UserProjection {
        UserProjection {
            public_id: self.public_id,
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
        }
    }
}
