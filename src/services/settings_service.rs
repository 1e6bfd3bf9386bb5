// src/services/settings_service.rs
// DOCUMENTATION: Shop settings business logic
// PURPOSE: Merge the settings row with environment fallbacks

use crate::config::Config;
use crate::db::SettingsRepository;
use crate::errors::StoreError;
use crate::models::{SaveSettingsRequest, Settings, ShopInfo};
use sqlx::PgPool;

pub struct SettingsService;

impl SettingsService {
    /// Effective settings: database value first, Config otherwise
    pub async fn get(pool: &PgPool, config: &Config) -> Result<Settings, StoreError> {
        let row = SettingsRepository::load(pool).await?;
        Ok(Settings::resolve(row, config))
    }

    /// Settings for notifications; a database failure degrades to the Config values
    pub async fn get_or_fallback(pool: &PgPool, config: &Config) -> Settings {
        match SettingsRepository::load(pool).await {
            Ok(row) => Settings::resolve(row, config),
            Err(e) => {
                log::warn!("Using environment settings, database unavailable: {}", e);
                Settings::resolve(None, config)
            }
        }
    }

    pub async fn shop_info(pool: &PgPool, config: &Config) -> Result<ShopInfo, StoreError> {
        Ok(Self::get(pool, config).await?.shop_info())
    }

    /// Validate and persist admin-submitted settings
    pub async fn save(pool: &PgPool, req: SaveSettingsRequest) -> Result<(), StoreError> {
        let row = req.into_row()?;
        SettingsRepository::save(pool, &row).await
    }
}
