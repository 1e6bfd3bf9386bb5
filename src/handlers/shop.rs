// src/handlers/shop.rs
// DOCUMENTATION: Public shop details
// PURPOSE: Shop contact and PromptPay receiver for the checkout page

use crate::config::Config;
use crate::errors::StoreError;
use crate::handlers::guard::method_not_allowed;
use crate::services::SettingsService;
use actix_web::{web, HttpResponse, Responder};
use sqlx::PgPool;

/// GET /api/shop-info
pub async fn shop_info(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
) -> Result<impl Responder, StoreError> {
    let info = SettingsService::shop_info(pool.get_ref(), config.get_ref()).await?;
    Ok(HttpResponse::Ok().json(info))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/shop-info")
            .route(web::get().to(shop_info))
            .default_service(web::to(method_not_allowed)),
    );
}
