// src/handlers/admin_orders.rs
// DOCUMENTATION: Admin order management
// PURPOSE: Search, status changes and deletion

use crate::config::Config;
use crate::errors::StoreError;
use crate::handlers::guard::{method_not_allowed, parse_id, require_admin, require_admin_csrf};
use crate::models::{OrderListQuery, UpdateOrderStatusRequest};
use crate::services::{OrderService, SessionStore};
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

/// GET /api/admin/orders?limit=&offset=&status=&search=
pub async fn search_orders(
    req: HttpRequest,
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    sessions: web::Data<Arc<SessionStore>>,
    query: web::Query<OrderListQuery>,
) -> Result<impl Responder, StoreError> {
    require_admin(&req, &config, &sessions).await?;

    let result = OrderService::search_orders(pool.get_ref(), query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(result))
}

/// POST /api/admin/orders/update
pub async fn update_order_status(
    req: HttpRequest,
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    sessions: web::Data<Arc<SessionStore>>,
    body: web::Json<UpdateOrderStatusRequest>,
) -> Result<impl Responder, StoreError> {
    let admin = require_admin_csrf(&req, &config, &sessions).await?;

    OrderService::update_status(pool.get_ref(), body.into_inner()).await?;
    log::info!("Order status updated by {}", admin.username);

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Order status updated."
    })))
}

/// DELETE /api/admin/orders/{id}
pub async fn delete_order(
    req: HttpRequest,
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    sessions: web::Data<Arc<SessionStore>>,
    path: web::Path<String>,
) -> Result<impl Responder, StoreError> {
    let admin = require_admin_csrf(&req, &config, &sessions).await?;
    let id = parse_id(&path, "order")?;

    OrderService::delete_order(pool.get_ref(), id).await?;
    log::info!("Order {} deleted by {}", id, admin.username);

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Order deleted."
    })))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/orders")
            .route(web::get().to(search_orders))
            .default_service(web::to(method_not_allowed)),
    )
    // registered before /orders/{id} so "update" is not taken for an id
    .service(
        web::resource("/orders/update")
            .route(web::post().to(update_order_status))
            .default_service(web::to(method_not_allowed)),
    )
    .service(
        web::resource("/orders/{id}")
            .route(web::delete().to(delete_order))
            .default_service(web::to(method_not_allowed)),
    );
}

#[cfg(test)]
mod tests {
    use crate::handlers::test_support::{test_app, TestState};
    use actix_web::http::StatusCode;
    use actix_web::test;
    use serde_json::{json, Value};

    #[actix_web::test]
    async fn test_search_requires_login() {
        let state = TestState::new();
        let app = test_app!(state);

        let req = test::TestRequest::get().uri("/api/admin/orders").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["message"], "Unauthorized. Please login.");
    }

    #[actix_web::test]
    async fn test_update_status_requires_csrf() {
        let state = TestState::new();
        let (cookie, _) = state.login().await;
        let app = test_app!(state);

        let req = test::TestRequest::post()
            .uri("/api/admin/orders/update")
            .cookie(cookie)
            .insert_header(("X-CSRF-Token", "forged"))
            .set_json(json!({ "id": 1, "status": "completed" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["message"], "Invalid CSRF token.");
    }

    #[actix_web::test]
    async fn test_update_status_rejects_unknown_status() {
        let state = TestState::new();
        let (cookie, csrf) = state.login().await;
        let app = test_app!(state);

        let req = test::TestRequest::post()
            .uri("/api/admin/orders/update")
            .cookie(cookie)
            .insert_header(("X-CSRF-Token", csrf))
            .set_json(json!({ "id": 1, "status": "shipped" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["message"], "Invalid order status value.");
    }

    #[actix_web::test]
    async fn test_expired_csrf_is_419() {
        let state = TestState::with_csrf_expiry(std::time::Duration::from_millis(30));
        let (cookie, csrf) = state.login().await;
        let app = test_app!(state);

        tokio::time::sleep(std::time::Duration::from_millis(80)).await;

        let req = test::TestRequest::delete()
            .uri("/api/admin/orders/3")
            .cookie(cookie)
            .insert_header(("X-CSRF-Token", csrf))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 419);
    }

    #[actix_web::test]
    async fn test_delete_invalid_id() {
        let state = TestState::new();
        let (cookie, csrf) = state.login().await;
        let app = test_app!(state);

        let req = test::TestRequest::delete()
            .uri("/api/admin/orders/zero")
            .cookie(cookie)
            .insert_header(("X-CSRF-Token", csrf))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
