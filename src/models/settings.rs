// src/models/settings.rs
// DOCUMENTATION: Shop settings data structures
// PURPOSE: Single-row shop configuration with environment fallbacks

use crate::config::Config;
use crate::errors::StoreError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::sync::OnceLock;

/// Raw settings row; every column may be NULL
#[derive(Debug, Clone, Default, FromRow)]
pub struct SettingsRow {
    pub shop_name: Option<String>,
    pub shop_phone: Option<String>,
    pub shop_email: Option<String>,
    pub shop_address: Option<String>,
    pub telegram_token: Option<String>,
    pub telegram_chat_id: Option<String>,
    pub promptpay_number: Option<String>,
    pub promptpay_name: Option<String>,
}

/// Effective shop settings
/// DOCUMENTATION: Database value when non-empty, otherwise the Config value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Settings {
    pub shop_name: String,
    pub shop_phone: String,
    pub shop_email: String,
    pub shop_address: String,
    pub telegram_token: String,
    pub telegram_chat_id: String,
    pub promptpay_id: String,
    pub promptpay_name: String,
}

impl Settings {
    pub fn resolve(row: Option<SettingsRow>, config: &Config) -> Self {
        let row = row.unwrap_or_default();
        let pick = |value: Option<String>, fallback: &str| {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| fallback.to_string())
        };

        Settings {
            shop_name: pick(row.shop_name, &config.site_name),
            shop_phone: pick(row.shop_phone, &config.shop_phone),
            shop_email: pick(row.shop_email, &config.shop_email),
            shop_address: pick(row.shop_address, ""),
            telegram_token: pick(row.telegram_token, &config.telegram_bot_token),
            telegram_chat_id: pick(row.telegram_chat_id, &config.telegram_chat_id),
            promptpay_id: pick(row.promptpay_number, &config.promptpay_id),
            promptpay_name: pick(row.promptpay_name, &config.promptpay_name),
        }
    }

    /// Telegram credentials, if both parts are configured
    pub fn telegram_credentials(&self) -> Option<(&str, &str)> {
        if self.telegram_token.is_empty() || self.telegram_chat_id.is_empty() {
            None
        } else {
            Some((&self.telegram_token, &self.telegram_chat_id))
        }
    }

    /// Public subset for the storefront
    pub fn shop_info(&self) -> ShopInfo {
        ShopInfo {
            shop_name: self.shop_name.clone(),
            shop_phone: self.shop_phone.clone(),
            shop_email: self.shop_email.clone(),
            shop_address: self.shop_address.clone(),
            promptpay_id: self.promptpay_id.clone(),
            promptpay_name: self.promptpay_name.clone(),
        }
    }
}

/// Storefront view of the settings (no Telegram credentials)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShopInfo {
    pub shop_name: String,
    pub shop_phone: String,
    pub shop_email: String,
    pub shop_address: String,
    pub promptpay_id: String,
    pub promptpay_name: String,
}

/// Request DTO for POST /api/admin/settings
#[derive(Debug, Default, Deserialize)]
pub struct SaveSettingsRequest {
    pub shop_name: Option<String>,
    pub shop_phone: Option<String>,
    pub shop_email: Option<String>,
    pub shop_address: Option<String>,
    pub telegram_token: Option<String>,
    pub telegram_chat_id: Option<String>,
    pub promptpay_id: Option<String>,
    pub promptpay_name: Option<String>,
}

impl SaveSettingsRequest {
    /// Trim every value and check formats of the non-empty ones
    pub fn into_row(self) -> Result<SettingsRow, StoreError> {
        let clean = |v: Option<String>| v.map(|s| s.trim().to_string()).unwrap_or_default();

        let row = SettingsRow {
            shop_name: Some(clean(self.shop_name)),
            shop_phone: Some(clean(self.shop_phone)),
            shop_email: Some(clean(self.shop_email)),
            shop_address: Some(clean(self.shop_address)),
            telegram_token: Some(clean(self.telegram_token)),
            telegram_chat_id: Some(clean(self.telegram_chat_id)),
            promptpay_number: Some(clean(self.promptpay_id)),
            promptpay_name: Some(clean(self.promptpay_name)),
        };

        if let Some(email) = row.shop_email.as_deref().filter(|e| !e.is_empty()) {
            if !validator::validate_email(email) {
                return Err(StoreError::ValidationError("Invalid shop email.".to_string()));
            }
        }
        if let Some(token) = row.telegram_token.as_deref().filter(|t| !t.is_empty()) {
            validate_telegram_token(token)?;
        }
        if let Some(chat_id) = row.telegram_chat_id.as_deref().filter(|c| !c.is_empty()) {
            validate_telegram_chat_id(chat_id)?;
        }
        if let Some(promptpay) = row.promptpay_number.as_deref().filter(|p| !p.is_empty()) {
            if !promptpay_regex().is_match(promptpay) {
                return Err(StoreError::ValidationError(
                    "PromptPay ID must be 10-13 digits.".to_string(),
                ));
            }
        }

        Ok(row)
    }
}

fn telegram_token_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[0-9A-Za-z:_-]+$").expect("valid regex"))
}

fn telegram_chat_id_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^@?[A-Za-z0-9_-]+$").expect("valid regex"))
}

fn promptpay_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[0-9]{10,13}$").expect("valid regex"))
}

pub fn validate_telegram_token(token: &str) -> Result<(), StoreError> {
    if telegram_token_regex().is_match(token) {
        Ok(())
    } else {
        Err(StoreError::ValidationError("Invalid Telegram bot token format.".to_string()))
    }
}

pub fn validate_telegram_chat_id(chat_id: &str) -> Result<(), StoreError> {
    if telegram_chat_id_regex().is_match(chat_id) {
        Ok(())
    } else {
        Err(StoreError::ValidationError("Invalid Telegram chat ID format.".to_string()))
    }
}

/// Request DTO for POST /api/admin/test-telegram
#[derive(Debug, Default, Deserialize)]
pub struct TestTelegramRequest {
    pub token: Option<String>,
    pub chat_id: Option<String>,
}
