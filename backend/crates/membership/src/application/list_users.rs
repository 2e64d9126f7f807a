//! List Users Use Case
//!
//! Admin view over all user records, reduced projections only.

use std::sync::Arc;

use crate::domain::entity::user::UserProjection;
use crate::domain::repository::UserRepository;
use crate::error::MembershipResult;

/// List users use case
pub struct ListUsersUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
}

impl<U> ListUsersUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    /// All users, password hash excluded at the query level
    pub async fn execute(&self) -> MembershipResult<Vec<UserProjection>> {
        self.user_repo.list_projections().await
    }
}
