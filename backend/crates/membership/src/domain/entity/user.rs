//! User Entity
//!
//! A single user record: identity, profile, credential hash and role.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::value_object::{
    display_name::DisplayName, email::Email, public_id::PublicId, user_id::UserId,
    user_password::PasswordHash, user_role::Role,
};

/// User entity
#[derive(Debug, Clone)]
pub struct User {
    /// Internal UUID identifier (never exposed to clients)
    pub user_id: UserId,
    /// Public-facing nanoid identifier (URL-safe, used in forms)
    pub public_id: PublicId,
    /// Display name
    pub name: DisplayName,
    /// Email address (unique, login identifier)
    pub email: Email,
    /// Argon2id password hash; the raw password is never stored
    pub password_hash: PasswordHash,
    /// Role (User or Admin)
    pub role: Role,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user
    ///
    /// The role is always the default (`Role::User`). Privilege is granted
    /// only through the admin role-change action, never at signup.
    pub fn new(name: DisplayName, email: Email, password_hash: PasswordHash) -> Self {
        let now = Utc::now();

        Self {
            user_id: UserId::new(),
            public_id: PublicId::new(),
            name,
            email,
            password_hash,
            role: Role::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Update user role
    pub fn set_role(&mut self, role: Role) {
        self.role = role;
        self.updated_at = Utc::now();
    }

    /// Reduced projection safe for session state and display contexts
    pub fn projection(&self) -> UserProjection {
        UserProjection {
            public_id: self.public_id,
            name: self.name.as_str().to_string(),
            email: self.email.as_str().to_string(),
            role: self.role,
        }
    }
}

/// Reduced user projection
///
/// The subset of a user record that may live in session state or be
/// rendered in views. Excludes the password hash by construction.
#[derive(Debug, Clone, Serialize)]
pub struct UserProjection {
    pub public_id: PublicId,
    pub name: String,
    pub email: String,
    pub role: Role,
}
