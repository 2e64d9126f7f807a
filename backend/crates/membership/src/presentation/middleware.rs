//! Auth Guards
//!
//! Middleware enforcing the two guard outcomes:
//! - not logged in → soft fail, 303 redirect to /login
//! - logged in but not admin → hard fail, 403 Forbidden
//!
//! The distinction is deliberate and load-bearing; do not collapse the two.

use axum::extract::{Request, State};
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::Next;
use axum::response::{Html, IntoResponse, Redirect, Response};

use crate::application::CheckSessionUseCase;
use crate::domain::entity::user::UserProjection;
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::presentation::handlers::AppState;
use crate::presentation::views;

/// The authenticated user, inserted into request extensions by the guards
#[derive(Debug, Clone)]
pub struct CurrentUser(pub UserProjection);

/// Guard 1: requires a prior login
///
/// Anonymous callers are redirected to the login entry point; the wrapped
/// handler never runs for them.
pub async fn require_login<R>(
    State(state): State<AppState<R>>,
    mut req: Request,
    next: Next,
) -> Response
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    match session_user(&state, req.headers()).await {
        Some(user) => {
            req.extensions_mut().insert(CurrentUser(user));
            next.run(req).await
        }
        None => Redirect::to("/login").into_response(),
    }
}

/// Guard 2: requires the admin role
///
/// No session behaves exactly like guard 1 (redirect). A session with the
/// wrong role is a hard stop: explicit 403, not a redirect.
pub async fn require_admin<R>(
    State(state): State<AppState<R>>,
    mut req: Request,
    next: Next,
) -> Response
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    match session_user(&state, req.headers()).await {
        None => Redirect::to("/login").into_response(),
        Some(user) if !user.role.is_admin() => {
            tracing::warn!(public_id = %user.public_id, "Non-admin denied access to admin route");
            (StatusCode::FORBIDDEN, Html(views::forbidden_page())).into_response()
        }
        Some(user) => {
            req.extensions_mut().insert(CurrentUser(user));
            next.run(req).await
        }
    }
}

/// Resolve the session cookie to a user projection, if any
async fn session_user<R>(state: &AppState<R>, headers: &HeaderMap) -> Option<UserProjection>
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let token = platform::cookie::extract_cookie(headers, &state.config.session_cookie_name)?;

    CheckSessionUseCase::new(state.repo.clone(), state.config.clone())
        .current_user(&token)
        .await
}
