// src/models/admin.rs
// DOCUMENTATION: Admin account and authentication DTOs
// PURPOSE: Login, password change and session responses

use crate::errors::StoreError;
use crate::models::input::non_empty;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Minimum length of an admin password
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Admin account row
/// No Debug derive: the password hash must never reach the logs
#[derive(Clone, FromRow)]
pub struct AdminUser {
    pub id: i64,
    pub username: String,
    pub password: String,
}

/// Request DTO for POST /api/admin/login
#[derive(Default, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Validated credentials
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl LoginRequest {
    pub fn into_credentials(self) -> Result<Credentials, StoreError> {
        let username = non_empty(&self.username).map(str::to_string);
        // passwords are compared verbatim, never trimmed
        let password = self.password.filter(|p| !p.is_empty());

        match (username, password) {
            (Some(username), Some(password)) => Ok(Credentials { username, password }),
            _ => Err(StoreError::InvalidInput(
                "Please enter username and password.".to_string(),
            )),
        }
    }
}

/// Request DTO for POST /api/admin/change-password
#[derive(Default, Deserialize)]
pub struct ChangePasswordRequest {
    pub old_password: Option<String>,
    pub new_password: Option<String>,
}

/// Validated password change
pub struct PasswordChange {
    pub old_password: String,
    pub new_password: String,
}

impl ChangePasswordRequest {
    pub fn into_change(self) -> Result<PasswordChange, StoreError> {
        let (old_password, new_password) = match (self.old_password, self.new_password) {
            (Some(old), Some(new)) if !old.is_empty() && !new.is_empty() => (old, new),
            _ => {
                return Err(StoreError::InvalidInput(
                    "Please fill in all fields.".to_string(),
                ))
            }
        };

        if new_password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(StoreError::ValidationError(format!(
                "New password must be at least {} characters.",
                MIN_PASSWORD_LENGTH
            )));
        }

        Ok(PasswordChange {
            old_password,
            new_password,
        })
    }
}

/// Response for a successful login
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub csrf_token: String,
}

/// Response for GET /api/admin/session
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatus {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub csrf_token: Option<String>,
}
