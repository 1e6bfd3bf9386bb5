// src/db/admin_repository.rs
// DOCUMENTATION: Database access for admin accounts
// PURPOSE: Credential lookup and password updates

use crate::errors::StoreError;
use crate::models::AdminUser;
use sqlx::PgPool;

pub struct AdminRepository;

impl AdminRepository {
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<AdminUser>, StoreError> {
        sqlx::query_as::<_, AdminUser>(
            "SELECT id, username, password FROM admin_users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to look up admin user: {}", e);
            StoreError::DatabaseError(e.to_string())
        })
    }

    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<AdminUser>, StoreError> {
        sqlx::query_as::<_, AdminUser>(
            "SELECT id, username, password FROM admin_users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to look up admin user {}: {}", id, e);
            StoreError::DatabaseError(e.to_string())
        })
    }

    /// Store a new password hash
    pub async fn update_password(pool: &PgPool, id: i64, hash: &str) -> Result<(), StoreError> {
        let rows = sqlx::query("UPDATE admin_users SET password = $1 WHERE id = $2")
            .bind(hash)
            .bind(id)
            .execute(pool)
            .await
            .map_err(|e| {
                log::error!("Password update failed for admin {}: {}", id, e);
                StoreError::DatabaseError(e.to_string())
            })?
            .rows_affected();

        if rows == 0 {
            return Err(StoreError::NotFound("User not found.".to_string()));
        }

        log::info!("Password changed for admin {}", id);
        Ok(())
    }

    /// Create the account or reset its password (bootstrap)
    pub async fn upsert(pool: &PgPool, username: &str, hash: &str) -> Result<i64, StoreError> {
        let (id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO admin_users (username, password)
            VALUES ($1, $2)
            ON CONFLICT (username) DO UPDATE SET password = EXCLUDED.password
            RETURNING id
            "#,
        )
        .bind(username)
        .bind(hash)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to upsert admin {}: {}", username, e);
            StoreError::DatabaseError(e.to_string())
        })?;

        Ok(id)
    }
}
