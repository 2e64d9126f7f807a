//! Membership Router

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use std::sync::Arc;

use crate::application::config::MembershipConfig;
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::infra::postgres::PgMembershipRepository;
use crate::presentation::handlers::{self, AppState};
use crate::presentation::middleware::{require_admin, require_login};

/// Create the membership router with the PostgreSQL repository
pub fn membership_router(repo: PgMembershipRepository, config: MembershipConfig) -> Router {
    membership_router_generic(repo, config)
}

/// Create a membership router for any repository implementation
pub fn membership_router_generic<R>(repo: R, config: MembershipConfig) -> Router
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let state = AppState {
        repo: Arc::new(repo),
        config: Arc::new(config),
    };

    // Authentication guard: soft fail, redirect to /login
    let members = Router::new()
        .route("/members", get(handlers::members))
        .route_layer(from_fn_with_state(state.clone(), require_login::<R>));

    // Authorization guard: redirect when anonymous, 403 when not admin
    let admin = Router::new()
        .route("/admin", get(handlers::admin::<R>))
        .route("/admin/update-user", post(handlers::update_user::<R>))
        .route_layer(from_fn_with_state(state.clone(), require_admin::<R>));

    Router::new()
        .route("/", get(handlers::home::<R>))
        .route(
            "/signup",
            get(handlers::signup_form).post(handlers::sign_up::<R>),
        )
        .route(
            "/login",
            get(handlers::login_form).post(handlers::log_in::<R>),
        )
        .route("/logout", get(handlers::log_out::<R>))
        .merge(members)
        .merge(admin)
        .fallback(handlers::not_found)
        .with_state(state)
}
