// src/services/auth_service.rs
// DOCUMENTATION: Admin credential checks
// PURPOSE: bcrypt hashing/verification and password changes

use crate::db::AdminRepository;
use crate::errors::StoreError;
use crate::models::{AdminUser, Credentials, PasswordChange};
use actix_web::web;
use bcrypt::{hash, verify, DEFAULT_COST};
use sqlx::PgPool;

/// Hash a password using bcrypt
pub fn hash_password(password: &str) -> Result<String, bcrypt::BcryptError> {
    hash(password, DEFAULT_COST)
}

/// Verify a password against a hash
/// DOCUMENTATION: Accepts $2a$/$2b$/$2y$ hashes, so accounts migrated from PHP keep working
pub fn verify_password(password: &str, hash: &str) -> Result<bool, bcrypt::BcryptError> {
    verify(password, hash)
}

pub struct AuthService;

impl AuthService {
    /// Check username/password, returns the admin on success
    pub async fn login(pool: &PgPool, credentials: Credentials) -> Result<AdminUser, StoreError> {
        let admin = AdminRepository::find_by_username(pool, &credentials.username).await?;

        let Some(admin) = admin else {
            log::warn!("Login attempt for unknown admin '{}'", credentials.username);
            return Err(StoreError::InvalidCredentials);
        };

        if !Self::verify_blocking(credentials.password, admin.password.clone()).await? {
            log::warn!("Failed login for admin '{}'", admin.username);
            return Err(StoreError::InvalidCredentials);
        }

        log::info!("Admin '{}' logged in", admin.username);
        Ok(admin)
    }

    /// Verify the old password, then store a hash of the new one
    pub async fn change_password(
        pool: &PgPool,
        admin_id: i64,
        change: PasswordChange,
    ) -> Result<(), StoreError> {
        let admin = AdminRepository::find_by_id(pool, admin_id)
            .await?
            .ok_or_else(|| StoreError::NotFound("User not found.".to_string()))?;

        if !Self::verify_blocking(change.old_password, admin.password).await? {
            log::warn!("Password change rejected for admin {}: wrong old password", admin_id);
            return Err(StoreError::InvalidInput(
                "Current password is incorrect.".to_string(),
            ));
        }

        let hashed = web::block(move || hash_password(&change.new_password))
            .await
            .map_err(|e| {
                log::error!("Password hashing task failed: {}", e);
                StoreError::InternalError
            })?
            .map_err(|e| {
                log::error!("Password hashing failed: {}", e);
                StoreError::InternalError
            })?;

        AdminRepository::update_password(pool, admin_id, &hashed).await
    }

    /// bcrypt is CPU-bound; keep it off the async workers
    async fn verify_blocking(password: String, hash: String) -> Result<bool, StoreError> {
        web::block(move || verify_password(&password, &hash))
            .await
            .map_err(|e| {
                log::error!("Password verification task failed: {}", e);
                StoreError::InternalError
            })?
            .or_else(|e| {
                // A malformed stored hash is a failed login, not a server error
                log::error!("Stored password hash is invalid: {}", e);
                Ok(false)
            })
    }
}
