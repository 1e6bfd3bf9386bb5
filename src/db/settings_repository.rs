// src/db/settings_repository.rs
// DOCUMENTATION: Database access for the single shop settings row
// PURPOSE: Load and upsert shop configuration

use crate::errors::StoreError;
use crate::models::SettingsRow;
use sqlx::PgPool;

pub struct SettingsRepository;

impl SettingsRepository {
    /// Fetch the settings row, if one was ever saved
    pub async fn load(pool: &PgPool) -> Result<Option<SettingsRow>, StoreError> {
        sqlx::query_as::<_, SettingsRow>(
            r#"
            SELECT shop_name, shop_phone, shop_email, shop_address,
                   telegram_token, telegram_chat_id, promptpay_number, promptpay_name
            FROM settings
            ORDER BY id ASC
            LIMIT 1
            "#,
        )
        .fetch_optional(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to load settings: {}", e);
            StoreError::DatabaseError(e.to_string())
        })
    }

    /// Update the first settings row, or insert one when the table is empty
    pub async fn save(pool: &PgPool, row: &SettingsRow) -> Result<(), StoreError> {
        let mut tx = pool.begin().await.map_err(|e| {
            log::error!("Failed to open settings transaction: {}", e);
            StoreError::DatabaseError(e.to_string())
        })?;

        let updated = sqlx::query(
            r#"
            UPDATE settings
            SET shop_name = $1,
                shop_phone = $2,
                shop_email = $3,
                shop_address = $4,
                telegram_token = $5,
                telegram_chat_id = $6,
                promptpay_number = $7,
                promptpay_name = $8,
                updated_at = NOW()
            WHERE id = (SELECT id FROM settings ORDER BY id ASC LIMIT 1)
            "#,
        )
        .bind(&row.shop_name)
        .bind(&row.shop_phone)
        .bind(&row.shop_email)
        .bind(&row.shop_address)
        .bind(&row.telegram_token)
        .bind(&row.telegram_chat_id)
        .bind(&row.promptpay_number)
        .bind(&row.promptpay_name)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            log::error!("Failed to update settings: {}", e);
            StoreError::DatabaseError(e.to_string())
        })?
        .rows_affected();

        if updated == 0 {
            sqlx::query(
                r#"
                INSERT INTO settings (
                    shop_name, shop_phone, shop_email, shop_address,
                    telegram_token, telegram_chat_id, promptpay_number, promptpay_name
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#,
            )
            .bind(&row.shop_name)
            .bind(&row.shop_phone)
            .bind(&row.shop_email)
            .bind(&row.shop_address)
            .bind(&row.telegram_token)
            .bind(&row.telegram_chat_id)
            .bind(&row.promptpay_number)
            .bind(&row.promptpay_name)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                log::error!("Failed to insert settings: {}", e);
                StoreError::DatabaseError(e.to_string())
            })?;
        }

        tx.commit().await.map_err(|e| {
            log::error!("Failed to commit settings: {}", e);
            StoreError::DatabaseError(e.to_string())
        })?;

        log::info!("Shop settings saved");
        Ok(())
    }

    /// Insert an empty settings row when none exists (bootstrap)
    pub async fn ensure_row(pool: &PgPool) -> Result<bool, StoreError> {
        let inserted = sqlx::query(
            "INSERT INTO settings (shop_name) SELECT NULL WHERE NOT EXISTS (SELECT 1 FROM settings)",
        )
        .execute(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to create default settings: {}", e);
            StoreError::DatabaseError(e.to_string())
        })?
        .rows_affected();

        Ok(inserted > 0)
    }
}
