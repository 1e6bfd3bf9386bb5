// src/handlers/orders.rs
// DOCUMENTATION: Order handlers under /api/orders
// PURPOSE: Public checkout and payment confirmation, admin order reads

use crate::config::Config;
use crate::errors::StoreError;
use crate::handlers::guard::{method_not_allowed, parse_id, require_admin};
use crate::models::{CreateOrderRequest, OrderActionRequest, OrderListQuery, PaymentConfirmation};
use crate::services::{Notifier, OrderService, SessionStore};
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

/// POST /api/orders
/// Checkout: validate, store, notify
pub async fn create_order(
    pool: web::Data<PgPool>,
    notifier: web::Data<Notifier>,
    body: web::Json<CreateOrderRequest>,
) -> Result<impl Responder, StoreError> {
    let created =
        OrderService::create_order(pool.get_ref(), notifier.get_ref(), body.into_inner()).await?;
    Ok(HttpResponse::Created().json(created))
}

/// GET /api/orders (admin)
/// Plain array of orders, newest first
pub async fn list_orders(
    req: HttpRequest,
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    sessions: web::Data<Arc<SessionStore>>,
    query: web::Query<OrderListQuery>,
) -> Result<impl Responder, StoreError> {
    require_admin(&req, &config, &sessions).await?;

    let orders = OrderService::list_orders(pool.get_ref(), query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(orders))
}

/// GET /api/orders/{id} (admin)
pub async fn get_order(
    req: HttpRequest,
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    sessions: web::Data<Arc<SessionStore>>,
    path: web::Path<String>,
) -> Result<impl Responder, StoreError> {
    require_admin(&req, &config, &sessions).await?;

    let id = parse_id(&path, "order")?;
    let order = OrderService::get_order(pool.get_ref(), id).await?;
    Ok(HttpResponse::Ok().json(order))
}

/// POST /api/orders/{id}
/// Customer confirms a PromptPay transfer: {"action": "confirm_payment", "email": ...}
pub async fn order_action(
    pool: web::Data<PgPool>,
    notifier: web::Data<Notifier>,
    path: web::Path<String>,
    body: web::Json<OrderActionRequest>,
) -> Result<impl Responder, StoreError> {
    let id = parse_id(&path, "order")?;

    let outcome =
        OrderService::confirm_payment(pool.get_ref(), notifier.get_ref(), id, body.into_inner())
            .await?;

    let message = match outcome {
        PaymentConfirmation::Confirmed => "Payment confirmed successfully.",
        PaymentConfirmation::AlreadyPaid => "Payment already confirmed.",
    };
    Ok(HttpResponse::Ok().json(json!({ "success": true, "message": message })))
}

/// Configuration for order routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/orders")
            .route(web::post().to(create_order))
            .route(web::get().to(list_orders))
            .default_service(web::to(method_not_allowed)),
    )
    .service(
        web::resource("/orders/{id}")
            .route(web::get().to(get_order))
            .route(web::post().to(order_action))
            .default_service(web::to(method_not_allowed)),
    );
}
