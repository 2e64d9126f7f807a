//! Form DTOs
//!
//! Typed request bodies for the urlencoded forms. Field names match the
//! form inputs rendered by the views.

use serde::Deserialize;

/// Signup form body
#[derive(Debug, Clone, Deserialize)]
pub struct SignUpForm {
    pub name: String,
    pub email: String,
    pub password: String,
    /// Accepted but never honored; see the signup use case
    #[serde(default)]
    pub role: Option<String>,
}

/// Login form body
#[derive(Debug, Clone, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Admin role-change form body
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserForm {
    /// Public ID of the target user
    pub user_id: String,
    /// "promote" or "demote"
    pub action: String,
}
