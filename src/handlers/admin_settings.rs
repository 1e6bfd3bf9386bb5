// src/handlers/admin_settings.rs
// DOCUMENTATION: Admin shop settings and Telegram test
// PURPOSE: Read/save the settings row, verify Telegram credentials

use crate::config::Config;
use crate::errors::StoreError;
use crate::handlers::guard::{method_not_allowed, require_admin, require_admin_csrf};
use crate::models::input::non_empty;
use crate::models::{
    validate_telegram_chat_id, validate_telegram_token, SaveSettingsRequest, TestTelegramRequest,
};
use crate::services::{Notifier, SessionStore, SettingsService};
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

/// GET /api/admin/settings
pub async fn get_settings(
    req: HttpRequest,
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    sessions: web::Data<Arc<SessionStore>>,
) -> Result<impl Responder, StoreError> {
    require_admin(&req, &config, &sessions).await?;

    let settings = SettingsService::get(pool.get_ref(), config.get_ref()).await?;
    Ok(HttpResponse::Ok().json(json!({ "settings": settings })))
}

/// POST /api/admin/settings
pub async fn save_settings(
    req: HttpRequest,
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    sessions: web::Data<Arc<SessionStore>>,
    body: web::Json<SaveSettingsRequest>,
) -> Result<impl Responder, StoreError> {
    let admin = require_admin_csrf(&req, &config, &sessions).await?;

    SettingsService::save(pool.get_ref(), body.into_inner()).await?;
    log::info!("Settings updated by {}", admin.username);

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Settings saved successfully."
    })))
}

/// POST /api/admin/test-telegram
/// Sends a test message with the submitted (possibly unsaved) credentials
pub async fn test_telegram(
    req: HttpRequest,
    config: web::Data<Config>,
    sessions: web::Data<Arc<SessionStore>>,
    notifier: web::Data<Notifier>,
    body: web::Json<TestTelegramRequest>,
) -> Result<impl Responder, StoreError> {
    require_admin_csrf(&req, &config, &sessions).await?;

    let body = body.into_inner();
    let (token, chat_id) = match (non_empty(&body.token), non_empty(&body.chat_id)) {
        (Some(token), Some(chat_id)) => (token, chat_id),
        _ => {
            return Err(StoreError::InvalidInput(
                "Missing token or chat_id".to_string(),
            ))
        }
    };
    validate_telegram_token(token)?;
    validate_telegram_chat_id(chat_id)?;

    notifier.test_message(token, chat_id).await.map_err(|_| {
        StoreError::InvalidInput(
            "Unable to send the message. Please check the token and chat ID.".to_string(),
        )
    })?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Test message sent successfully."
    })))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/settings")
            .route(web::get().to(get_settings))
            .route(web::post().to(save_settings))
            .default_service(web::to(method_not_allowed)),
    )
    .service(
        web::resource("/test-telegram")
            .route(web::post().to(test_telegram))
            .default_service(web::to(method_not_allowed)),
    );
}
