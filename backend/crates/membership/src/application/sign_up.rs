//! Sign Up Use Case
//!
//! Creates a new user account and establishes a session.

use std::sync::Arc;

use crate::application::config::MembershipConfig;
use crate::application::token::generate_session_token;
use crate::domain::entity::{session::Session, user::User};
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::domain::value_object::{
    display_name::DisplayName,
    email::Email,
    user_password::{PasswordHash, RawPassword},
};
use crate::error::{MembershipError, MembershipResult};

/// Sign up input
pub struct SignUpInput {
    pub name: String,
    pub email: String,
    pub password: String,
    /// Role field as submitted by the client. Always ignored; accounts
    /// start as `user` no matter what was posted.
    pub requested_role: Option<String>,
}

/// Sign up output
#[derive(Debug)]
pub struct SignUpOutput {
    /// Session token for cookie
    pub session_token: String,
    /// Public ID of the new user
    pub public_id: String,
}

/// Sign up use case
pub struct SignUpUseCase<U, S>
where
    U: UserRepository,
    S: SessionRepository,
{
    user_repo: Arc<U>,
    session_repo: Arc<S>,
    config: Arc<MembershipConfig>,
}

impl<U, S> SignUpUseCase<U, S>
where
    U: UserRepository,
    S: SessionRepository,
{
    pub fn new(user_repo: Arc<U>, session_repo: Arc<S>, config: Arc<MembershipConfig>) -> Self {
        Self {
            user_repo,
            session_repo,
            config,
        }
    }

    pub async fn execute(&self, input: SignUpInput) -> MembershipResult<SignUpOutput> {
        // Validate shape; each failure names the violated field
        let name = DisplayName::new(input.name)
            .map_err(|e| MembershipError::validation("name", e.message().to_string()))?;

        let email = Email::new(input.email)
            .map_err(|e| MembershipError::validation("email", e.message().to_string()))?;

        let raw_password = RawPassword::new(input.password)
            .map_err(|e| MembershipError::validation("password", e.message().to_string()))?;

        // Privilege escalation at signup is not a thing
        if let Some(role) = input.requested_role.as_deref() {
            if role != "user" {
                tracing::warn!(requested_role = %role, "Ignoring client-supplied role at signup");
            }
        }

        // Fast-path uniqueness check; the store's unique index is the
        // source of truth and also rejects concurrent duplicates
        if self.user_repo.exists_by_email(email.as_str()).await? {
            return Err(MembershipError::DuplicateUser);
        }

        // Hash and persist
        let password_hash = PasswordHash::from_raw(&raw_password, self.config.pepper())
            .map_err(|e| MembershipError::Internal(e.to_string()))?;

        let user = User::new(name, email, password_hash);
        self.user_repo.create(&user).await?;

        // Establish session
        let ttl = chrono::Duration::from_std(self.config.session_ttl)
            .map_err(|e| MembershipError::Internal(format!("Invalid session TTL: {e}")))?;
        let session = Session::new(&user, ttl);
        self.session_repo.create(&session).await?;

        let session_token = generate_session_token(session.session_id, &self.config.session_secret);

        tracing::info!(
            public_id = %user.public_id,
            "User signed up"
        );

        Ok(SignUpOutput {
            session_token,
            public_id: user.public_id.to_string(),
        })
    }
}
