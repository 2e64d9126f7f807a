//! Sign Out Use Case
//!
//! Invalidates a user session. Idempotent: a missing or invalid token is
//! not an error, the caller always ends up logged out.

use std::sync::Arc;

use crate::application::config::MembershipConfig;
use crate::application::token::verify_session_token;
use crate::domain::repository::SessionRepository;
use crate::error::MembershipResult;

/// Sign out use case
pub struct SignOutUseCase<S>
where
    S: SessionRepository,
{
    session_repo: Arc<S>,
    config: Arc<MembershipConfig>,
}

impl<S> SignOutUseCase<S>
where
    S: SessionRepository,
{
    pub fn new(session_repo: Arc<S>, config: Arc<MembershipConfig>) -> Self {
        Self {
            session_repo,
            config,
        }
    }

    /// Sign out from the current session
    pub async fn execute(&self, session_token: &str) -> MembershipResult<()> {
        let session_id = match verify_session_token(session_token, &self.config.session_secret) {
            Ok(id) => id,
            // Nothing to destroy; still a successful logout
            Err(_) => return Ok(()),
        };

        self.session_repo.delete(session_id).await?;

        tracing::info!(session_id = %session_id, "User signed out");
        Ok(())
    }
}
