//! Check Session Use Case
//!
//! Verifies a cookie token and retrieves the associated session.

use std::sync::Arc;

use crate::application::config::MembershipConfig;
use crate::application::token::verify_session_token;
use crate::domain::entity::{session::Session, user::UserProjection};
use crate::domain::repository::SessionRepository;
use crate::error::{MembershipError, MembershipResult};

/// Check session use case
pub struct CheckSessionUseCase<S>
where
    S: SessionRepository,
{
    session_repo: Arc<S>,
    config: Arc<MembershipConfig>,
}

impl<S> CheckSessionUseCase<S>
where
    S: SessionRepository,
{
    pub fn new(session_repo: Arc<S>, config: Arc<MembershipConfig>) -> Self {
        Self {
            session_repo,
            config,
        }
    }

    /// Verify the token and load the session
    pub async fn get_session(&self, session_token: &str) -> MembershipResult<Session> {
        let session_id = verify_session_token(session_token, &self.config.session_secret)?;

        let session = self
            .session_repo
            .find_by_id(session_id)
            .await?
            .ok_or(MembershipError::SessionInvalid)?;

        if session.is_expired() {
            self.session_repo.delete(session_id).await?;
            return Err(MembershipError::SessionInvalid);
        }

        Ok(session)
    }

    /// Best-effort peek at the current user (for views with user-or-null
    /// context); any failure maps to anonymous
    pub async fn current_user(&self, session_token: &str) -> Option<UserProjection> {
        self.get_session(session_token)
            .await
            .ok()
            .map(|s| s.projection())
    }
}
