//! Membership Error Types
//!
//! This module provides membership-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Membership-specific result type alias
pub type MembershipResult<T> = Result<T, MembershipError>;

/// Membership-specific error variants
#[derive(Debug, Error)]
pub enum MembershipError {
    /// Malformed input; the message names the violated field
    #[error("Invalid {field}: {message}")]
    Validation { field: &'static str, message: String },

    /// Malformed login input (deliberately vague, no schema details)
    #[error("Invalid email or password format")]
    CredentialFormat,

    /// Signup with an email that is already registered
    #[error("A user with that email already exists")]
    DuplicateUser,

    /// Unknown email or wrong password.
    /// The wording is identical for both cases to prevent user enumeration.
    #[error("Invalid email/password combination")]
    InvalidCredentials,

    /// Authenticated but lacking the required role
    #[error("Not authorized")]
    NotAuthorized,

    /// An admin attempted to demote their own account
    #[error("Administrators cannot demote their own account")]
    SelfDemotion,

    /// Target user does not exist
    #[error("User not found")]
    UserNotFound,

    /// Session not found or expired
    #[error("Session not found or expired")]
    SessionInvalid,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl MembershipError {
    /// Shorthand for a field-level validation error
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        MembershipError::Validation {
            field,
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            MembershipError::Validation { .. } | MembershipError::CredentialFormat => {
                StatusCode::BAD_REQUEST
            }
            MembershipError::DuplicateUser => StatusCode::CONFLICT,
            MembershipError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            MembershipError::NotAuthorized => StatusCode::FORBIDDEN,
            MembershipError::SelfDemotion => StatusCode::CONFLICT,
            MembershipError::UserNotFound => StatusCode::NOT_FOUND,
            MembershipError::SessionInvalid => StatusCode::UNAUTHORIZED,
            MembershipError::Database(_) | MembershipError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            MembershipError::Validation { .. } | MembershipError::CredentialFormat => {
                ErrorKind::BadRequest
            }
            MembershipError::DuplicateUser | MembershipError::SelfDemotion => ErrorKind::Conflict,
            MembershipError::InvalidCredentials | MembershipError::SessionInvalid => {
                ErrorKind::Unauthorized
            }
            MembershipError::NotAuthorized => ErrorKind::Forbidden,
            MembershipError::UserNotFound => ErrorKind::NotFound,
            MembershipError::Database(_) | MembershipError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    /// Convert to AppError
    ///
    /// Server-side failures are flattened to a generic message; the detail
    /// stays in the logs.
    pub fn to_app_error(&self) -> AppError {
        match self {
            MembershipError::Database(_) | MembershipError::Internal(_) => {
                AppError::new(self.kind(), "Internal server error")
            }
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            MembershipError::Database(e) => {
                tracing::error!(error = %e, "Membership database error");
            }
            MembershipError::Internal(msg) => {
                tracing::error!(message = %msg, "Membership internal error");
            }
            MembershipError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            MembershipError::NotAuthorized => {
                tracing::warn!("Rejected request lacking admin role");
            }
            MembershipError::SelfDemotion => {
                tracing::warn!("Admin attempted to demote their own account");
            }
            _ => {
                tracing::debug!(error = %self, "Membership error");
            }
        }
    }
}

impl IntoResponse for MembershipError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AppError> for MembershipError {
    fn from(err: AppError) -> Self {
        MembershipError::Internal(err.to_string())
    }
}
