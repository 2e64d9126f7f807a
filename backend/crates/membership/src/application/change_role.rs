//! Change Role Use Case
//!
//! Admin-only promotion/demotion of a user's role. The caller must have
//! passed the authorization guard; this use case enforces the remaining
//! domain rules (input shape, self-demotion, target existence).

use std::sync::Arc;

use derive_more::Display;

use crate::domain::entity::user::UserProjection;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{public_id::PublicId, user_role::Role};
use crate::error::{MembershipError, MembershipResult};

/// Role change action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum RoleAction {
    #[display("promote")]
    Promote,
    #[display("demote")]
    Demote,
}

impl RoleAction {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "promote" => Some(RoleAction::Promote),
            "demote" => Some(RoleAction::Demote),
            _ => None,
        }
    }

    /// The role this action assigns
    pub fn target_role(&self) -> Role {
        match self {
            RoleAction::Promote => Role::Admin,
            RoleAction::Demote => Role::User,
        }
    }
}

/// Change role input
pub struct ChangeRoleInput {
    /// Public ID of the target user
    pub user_id: String,
    /// "promote" or "demote"
    pub action: String,
}

/// Change role use case
pub struct ChangeRoleUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
}

impl<U> ChangeRoleUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    pub async fn execute(
        &self,
        input: ChangeRoleInput,
        acting: &UserProjection,
    ) -> MembershipResult<()> {
        let target = PublicId::parse_str(&input.user_id)
            .map_err(|_| MembershipError::validation("userId", "not a valid user id"))?;

        let action = RoleAction::parse(&input.action).ok_or_else(|| {
            MembershipError::validation("action", "must be \"promote\" or \"demote\"")
        })?;

        // An admin may not demote themself
        if action == RoleAction::Demote && target == acting.public_id {
            return Err(MembershipError::SelfDemotion);
        }

        let user = self
            .user_repo
            .find_by_public_id(&target)
            .await?
            .ok_or(MembershipError::UserNotFound)?;

        // Single atomic record update; no partial role state is observable
        self.user_repo
            .update_role(&user.user_id, action.target_role())
            .await?;

        tracing::info!(
            target = %target,
            action = %action,
            acting = %acting.public_id,
            "User role changed"
        );

        Ok(())
    }
}
