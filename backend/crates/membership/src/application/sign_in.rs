//! Sign In Use Case
//!
//! Authenticates a user and creates a session.

use std::sync::Arc;

use crate::application::config::MembershipConfig;
use crate::application::token::generate_session_token;
use crate::domain::entity::session::Session;
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::domain::value_object::{email::Email, user_password::RawPassword};
use crate::error::{MembershipError, MembershipResult};

/// Sign in input
pub struct SignInInput {
    pub email: String,
    pub password: String,
}

/// Sign in output
#[derive(Debug)]
pub struct SignInOutput {
    /// Session token for cookie
    pub session_token: String,
    /// Public ID
    pub public_id: String,
}

/// Sign in use case
pub struct SignInUseCase<U, S>
where
    U: UserRepository,
    S: SessionRepository,
{
    user_repo: Arc<U>,
    session_repo: Arc<S>,
    config: Arc<MembershipConfig>,
}

impl<U, S> SignInUseCase<U, S>
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

    pub async fn execute(&self, input: SignInInput) -> MembershipResult<SignInOutput> {
        // Shape failures get a deliberately vague message, distinct from
        // the credential mismatch below
        let email =
            Email::new(input.email).map_err(|_| MembershipError::CredentialFormat)?;
        let raw_password =
            RawPassword::new(input.password).map_err(|_| MembershipError::CredentialFormat)?;

        // Lookup is by email only; the password is checked exclusively
        // through hash verification
        let user = match self.user_repo.find_by_email(email.as_str()).await? {
            Some(user) => user,
            None => {
                tracing::warn!("Login attempt for unknown email");
                return Err(MembershipError::InvalidCredentials);
            }
        };

        let password_valid = user
            .password_hash
            .verify(&raw_password, self.config.pepper());

        if !password_valid {
            // Same error as unknown email; no user enumeration
            tracing::warn!(public_id = %user.public_id, "Password mismatch at login");
            return Err(MembershipError::InvalidCredentials);
        }

        // Create a fresh session; no session reuse across logins
        let ttl = chrono::Duration::from_std(self.config.session_ttl)
            .map_err(|e| MembershipError::Internal(format!("Invalid session TTL: {e}")))?;
        let session = Session::new(&user, ttl);
        self.session_repo.create(&session).await?;

        let session_token = generate_session_token(session.session_id, &self.config.session_secret);

        tracing::info!(
            public_id = %user.public_id,
            session_id = %session.session_id,
            "User signed in"
        );

        Ok(SignInOutput {
            session_token,
            public_id: user.public_id.to_string(),
        })
    }
}
