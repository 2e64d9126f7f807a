//! Membership Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Business logic, entities, repository traits
//! - `application/` - Use cases and application services
//! - `infra/` - Database implementations
//! - `presentation/` - HTTP handlers, DTOs, guards, router, views
//!
//! ## Features
//! - User signup/login with email + password
//! - Server-side sessions with HMAC-signed cookie tokens
//! - Role-based access (User, Admin) with two distinct guard outcomes:
//!   redirect for anonymous callers, 403 for wrong role
//! - Admin role management with a self-demotion guard
//!
//! ## Security Model
//! - Passwords hashed with Argon2id, never stored raw, never in sessions
//! - Login lookup by email only; password checked via hash verification
//! - Identical error wording for unknown email and wrong password
//! - Email uniqueness backed by a store-level unique index

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use application::config::MembershipConfig;
pub use error::{MembershipError, MembershipResult};
pub use infra::postgres::PgMembershipRepository;
pub use presentation::router::membership_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod handlers {
    pub use crate::presentation::handlers::*;
}

pub mod store {
    pub use crate::infra::postgres::PgMembershipRepository as MembershipStore;
}

pub mod router {
    pub use crate::presentation::router::*;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}

pub mod views {
    pub use crate::presentation::views::*;
}
