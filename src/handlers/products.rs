// src/handlers/products.rs
// DOCUMENTATION: Storefront catalog handlers
// PURPOSE: Public product listing and detail

use crate::errors::StoreError;
use crate::handlers::guard::{method_not_allowed, parse_id};
use crate::models::ProductQuery;
use crate::services::ProductService;
use actix_web::{web, HttpResponse, Responder};
use sqlx::PgPool;

/// GET /api/products?category=
pub async fn list_products(
    pool: web::Data<PgPool>,
    query: web::Query<ProductQuery>,
) -> Result<impl Responder, StoreError> {
    let products = ProductService::list_products(pool.get_ref(), query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(products))
}

/// GET /api/products/{id}
pub async fn get_product(
    pool: web::Data<PgPool>,
    path: web::Path<String>,
) -> Result<impl Responder, StoreError> {
    let id = parse_id(&path, "product")?;
    let product = ProductService::get_product(pool.get_ref(), id).await?;
    Ok(HttpResponse::Ok().json(product))
}

/// Configuration for storefront product routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/products")
            .route(web::get().to(list_products))
            .default_service(web::to(method_not_allowed)),
    )
    .service(
        web::resource("/products/{id}")
            .route(web::get().to(get_product))
            .default_service(web::to(method_not_allowed)),
    );
}
