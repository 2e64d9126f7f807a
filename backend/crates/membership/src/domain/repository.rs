//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.
//! Every operation is a single round trip against an externally consistent
//! store; no in-process locking is required.

use crate::domain::entity::{
    session::Session,
    user::{User, UserProjection},
};
use crate::domain::value_object::{public_id::PublicId, user_id::UserId, user_role::Role};
use crate::error::MembershipResult;
use uuid::Uuid;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Create a new user
    ///
    /// Returns `DuplicateUser` when the store's email uniqueness constraint
    /// rejects the insert. The constraint is the source of truth; callers may
    /// use [`exists_by_email`](Self::exists_by_email) only as a fast path.
    async fn create(&self, user: &User) -> MembershipResult<()>;

    /// Find user by email (exact match)
    async fn find_by_email(&self, email: &str) -> MembershipResult<Option<User>>;

    /// Find user by public ID
    async fn find_by_public_id(&self, public_id: &PublicId) -> MembershipResult<Option<User>>;

    /// Check if a user with this email exists
    async fn exists_by_email(&self, email: &str) -> MembershipResult<bool>;

    /// Update a user's role (single atomic record update)
    async fn update_role(&self, user_id: &UserId, role: Role) -> MembershipResult<()>;

    /// List all users as reduced projections (password hash never selected)
    async fn list_projections(&self) -> MembershipResult<Vec<UserProjection>>;
}

/// Session repository trait
#[trait_variant::make(SessionRepository: Send)]
pub trait LocalSessionRepository {
    /// Create a new session
    async fn create(&self, session: &Session) -> MembershipResult<()>;

    /// Find a live session by ID
    async fn find_by_id(&self, session_id: Uuid) -> MembershipResult<Option<Session>>;

    /// Delete a session
    async fn delete(&self, session_id: Uuid) -> MembershipResult<()>;

    /// Clean up expired sessions
    async fn cleanup_expired(&self) -> MembershipResult<u64>;
}
