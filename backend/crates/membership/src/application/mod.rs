//! Application Layer
//!
//! Use cases and application services.

pub mod change_role;
pub mod check_session;
pub mod config;
pub mod list_users;
pub mod sign_in;
pub mod sign_out;
pub mod sign_up;

pub(crate) mod token;

// Re-exports
pub use change_role::{ChangeRoleInput, ChangeRoleUseCase, RoleAction};
pub use check_session::CheckSessionUseCase;
pub use config::MembershipConfig;
pub use list_users::ListUsersUseCase;
pub use sign_in::{SignInInput, SignInOutput, SignInUseCase};
pub use sign_out::SignOutUseCase;
pub use sign_up::{SignUpInput, SignUpOutput, SignUpUseCase};
