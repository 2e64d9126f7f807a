//! HTTP Handlers

use axum::Form;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{Html, IntoResponse, Redirect, Response};
use std::sync::Arc;

use platform::cookie::CookieConfig;

use crate::application::{
    ChangeRoleInput, ChangeRoleUseCase, CheckSessionUseCase, ListUsersUseCase, MembershipConfig,
    SignInInput, SignInUseCase, SignOutUseCase, SignUpInput, SignUpUseCase,
};
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::error::MembershipError;
use crate::presentation::dto::{LoginForm, SignUpForm, UpdateUserForm};
use crate::presentation::middleware::CurrentUser;
use crate::presentation::views;

/// Gallery images for the members area (static assets)
const GALLERY: &[&str] = &["gallery1.svg", "gallery2.svg", "gallery3.svg"];

/// Shared state for membership handlers
#[derive(Clone)]
pub struct AppState<R>
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<MembershipConfig>,
}

// ============================================================================
// Home
// ============================================================================

/// GET /
pub async fn home<R>(State(state): State<AppState<R>>, headers: HeaderMap) -> Html<String>
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    // Best-effort session peek; anonymous on any failure
    let user = match extract_session_cookie(&headers, &state.config.session_cookie_name) {
        Some(token) => {
            CheckSessionUseCase::new(state.repo.clone(), state.config.clone())
                .current_user(&token)
                .await
        }
        None => None,
    };

    Html(views::home_page(user.as_ref()))
}

// ============================================================================
// Sign Up
// ============================================================================

/// GET /signup
pub async fn signup_form() -> Html<String> {
    Html(views::signup_page(None))
}

/// POST /signup
pub async fn sign_up<R>(
    State(state): State<AppState<R>>,
    Form(form): Form<SignUpForm>,
) -> Response
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let use_case = SignUpUseCase::new(state.repo.clone(), state.repo.clone(), state.config.clone());

    let input = SignUpInput {
        name: form.name,
        email: form.email,
        password: form.password,
        requested_role: form.role,
    };

    match use_case.execute(input).await {
        Ok(output) => {
            let cookie = build_session_cookie(&state.config, &output.session_token);
            ([(header::SET_COOKIE, cookie)], Redirect::to("/")).into_response()
        }
        // Shape errors name the field; duplicates get a friendly message.
        // Both re-render the form rather than surfacing a hard error.
        Err(e @ MembershipError::Validation { .. }) => (
            StatusCode::BAD_REQUEST,
            Html(views::signup_page(Some(&e.to_string()))),
        )
            .into_response(),
        Err(e @ MembershipError::DuplicateUser) => (
            StatusCode::CONFLICT,
            Html(views::signup_page(Some(&e.to_string()))),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

// ============================================================================
// Login
// ============================================================================

/// GET /login
pub async fn login_form() -> Html<String> {
    Html(views::login_page(None))
}

/// POST /login
pub async fn log_in<R>(State(state): State<AppState<R>>, Form(form): Form<LoginForm>) -> Response
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let use_case = SignInUseCase::new(state.repo.clone(), state.repo.clone(), state.config.clone());

    let input = SignInInput {
        email: form.email,
        password: form.password,
    };

    match use_case.execute(input).await {
        Ok(output) => {
            let cookie = build_session_cookie(&state.config, &output.session_token);
            ([(header::SET_COOKIE, cookie)], Redirect::to("/")).into_response()
        }
        // Re-render the login view; the message is identical for unknown
        // email and wrong password, and vague for malformed input
        Err(e @ MembershipError::CredentialFormat) => (
            StatusCode::BAD_REQUEST,
            Html(views::login_page(Some(&e.to_string()))),
        )
            .into_response(),
        Err(e @ MembershipError::InvalidCredentials) => (
            StatusCode::UNAUTHORIZED,
            Html(views::login_page(Some(&e.to_string()))),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

// ============================================================================
// Logout
// ============================================================================

/// GET /logout
pub async fn log_out<R>(State(state): State<AppState<R>>, headers: HeaderMap) -> Response
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    if let Some(token) = extract_session_cookie(&headers, &state.config.session_cookie_name) {
        let use_case = SignOutUseCase::new(state.repo.clone(), state.config.clone());
        // Logout never fails from the caller's perspective
        if let Err(e) = use_case.execute(&token).await {
            tracing::warn!(error = %e, "Session delete failed during logout");
        }
    }

    let cookie = build_clear_cookie(&state.config);
    ([(header::SET_COOKIE, cookie)], Redirect::to("/")).into_response()
}

// ============================================================================
// Members (behind the authentication guard)
// ============================================================================

/// GET /members
pub async fn members(
    axum::Extension(CurrentUser(user)): axum::Extension<CurrentUser>,
) -> Html<String> {
    use rand::Rng;
    let image = GALLERY[rand::rng().random_range(0..GALLERY.len())];

    Html(views::members_page(&user, image))
}

// ============================================================================
// Admin (behind the authorization guard)
// ============================================================================

/// GET /admin
pub async fn admin<R>(
    State(state): State<AppState<R>>,
    axum::Extension(CurrentUser(acting)): axum::Extension<CurrentUser>,
) -> Response
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let use_case = ListUsersUseCase::new(state.repo.clone());

    match use_case.execute().await {
        Ok(users) => Html(views::admin_page(&users, &acting)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// POST /admin/update-user
pub async fn update_user<R>(
    State(state): State<AppState<R>>,
    axum::Extension(CurrentUser(acting)): axum::Extension<CurrentUser>,
    Form(form): Form<UpdateUserForm>,
) -> Response
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let use_case = ChangeRoleUseCase::new(state.repo.clone());

    let input = ChangeRoleInput {
        user_id: form.user_id,
        action: form.action,
    };

    match use_case.execute(input, &acting).await {
        Ok(()) => Redirect::to("/admin").into_response(),
        Err(e) => e.into_response(),
    }
}

// ============================================================================
// Fallback
// ============================================================================

/// Any unmatched route
pub async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Html(views::not_found_page())).into_response()
}

// ============================================================================
// Helper Functions
// ============================================================================

fn extract_session_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    platform::cookie::extract_cookie(headers, name)
}

fn cookie_config(config: &MembershipConfig) -> CookieConfig {
    CookieConfig {
        name: config.session_cookie_name.clone(),
        secure: config.cookie_secure,
        http_only: true,
        same_site: config.cookie_same_site,
        path: "/".to_string(),
        max_age_secs: Some(config.session_ttl_secs()),
    }
}

fn build_session_cookie(config: &MembershipConfig, token: &str) -> String {
    cookie_config(config).build_set_cookie(token)
}

fn build_clear_cookie(config: &MembershipConfig) -> String {
    cookie_config(config).build_delete_cookie()
}
