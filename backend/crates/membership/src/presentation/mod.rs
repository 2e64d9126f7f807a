//! Presentation Layer
//!
//! HTTP handlers, DTOs, guards, router, and views.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod views;

pub use handlers::AppState;
pub use middleware::{CurrentUser, require_admin, require_login};
pub use router::{membership_router, membership_router_generic};
