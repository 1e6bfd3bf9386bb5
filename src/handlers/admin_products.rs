// src/handlers/admin_products.rs
// DOCUMENTATION: Admin catalog management
// PURPOSE: Create, update and delete products

use crate::config::Config;
use crate::errors::StoreError;
use crate::handlers::guard::{method_not_allowed, parse_id, require_admin, require_admin_csrf};
use crate::models::{CreateProductRequest, ProductQuery, UpdateProductRequest};
use crate::services::{ProductService, SessionStore};
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

/// GET /api/admin/products
pub async fn list_products(
    req: HttpRequest,
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    sessions: web::Data<Arc<SessionStore>>,
) -> Result<impl Responder, StoreError> {
    require_admin(&req, &config, &sessions).await?;

    let products = ProductService::list_products(pool.get_ref(), ProductQuery::default()).await?;
    Ok(HttpResponse::Ok().json(json!({ "products": products })))
}

/// POST /api/admin/products
pub async fn create_product(
    req: HttpRequest,
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    sessions: web::Data<Arc<SessionStore>>,
    body: web::Json<CreateProductRequest>,
) -> Result<impl Responder, StoreError> {
    require_admin_csrf(&req, &config, &sessions).await?;

    let created = ProductService::create_product(pool.get_ref(), body.into_inner()).await?;
    Ok(HttpResponse::Created().json(created))
}

/// PUT|POST /api/admin/products/update
pub async fn update_product(
    req: HttpRequest,
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    sessions: web::Data<Arc<SessionStore>>,
    body: web::Json<UpdateProductRequest>,
) -> Result<impl Responder, StoreError> {
    require_admin_csrf(&req, &config, &sessions).await?;

    ProductService::update_product(pool.get_ref(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Product updated successfully"
    })))
}

/// DELETE /api/admin/products/{id}
pub async fn delete_product(
    req: HttpRequest,
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    sessions: web::Data<Arc<SessionStore>>,
    path: web::Path<String>,
) -> Result<impl Responder, StoreError> {
    require_admin_csrf(&req, &config, &sessions).await?;
    let id = parse_id(&path, "product")?;

    ProductService::delete_product(pool.get_ref(), id).await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Product deleted successfully"
    })))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/products")
            .route(web::get().to(list_products))
            .route(web::post().to(create_product))
            .default_service(web::to(method_not_allowed)),
    )
    .service(
        web::resource("/products/update")
            .route(web::put().to(update_product))
            .route(web::post().to(update_product))
            .default_service(web::to(method_not_allowed)),
    )
    .service(
        web::resource("/products/{id}")
            .route(web::delete().to(delete_product))
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
    async fn test_create_product_validation() {
        let state = TestState::new();
        let (cookie, csrf) = state.login().await;
        let app = test_app!(state);

        let req = test::TestRequest::post()
            .uri("/api/admin/products")
            .cookie(cookie.clone())
            .insert_header(("X-CSRF-Token", csrf.clone()))
            .set_json(json!({ "name": "Bow" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["message"], "Missing required fields");

        let req = test::TestRequest::post()
            .uri("/api/admin/products")
            .cookie(cookie)
            .insert_header(("X-CSRF-Token", csrf))
            .set_json(json!({ "name": "Bow", "price": -5 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["message"], "Invalid price value");
    }

    #[actix_web::test]
    async fn test_update_product_accepts_put_and_post() {
        let state = TestState::new();
        let (cookie, csrf) = state.login().await;
        let app = test_app!(state);

        for req in [
            test::TestRequest::put(),
            test::TestRequest::post(),
        ] {
            let req = req
                .uri("/api/admin/products/update")
                .cookie(cookie.clone())
                .insert_header(("X-CSRF-Token", csrf.clone()))
                .set_json(json!({ "name": "Bow" }))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["error"]["message"], "Missing product ID");
        }
    }

    #[actix_web::test]
    async fn test_products_route_method_not_allowed() {
        let state = TestState::new();
        let app = test_app!(state);

        let req = test::TestRequest::patch()
            .uri("/api/admin/products/update")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[actix_web::test]
    async fn test_delete_requires_login() {
        let state = TestState::new();
        let app = test_app!(state);

        let req = test::TestRequest::delete()
            .uri("/api/admin/products/4")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
