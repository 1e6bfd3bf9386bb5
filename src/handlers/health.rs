// src/handlers/health.rs
// DOCUMENTATION: Health check handlers
// PURPOSE: Liveness plus a readiness probe that pings the database

use crate::errors::StoreError;
use actix_web::{web, HttpResponse, Responder};
use serde_json::json;
use sqlx::PgPool;

pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "service": "storefront",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

pub async fn readiness_check(pool: web::Data<PgPool>) -> Result<impl Responder, StoreError> {
    sqlx::query("SELECT 1")
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            log::warn!("Readiness check failed: {}", e);
            StoreError::ServiceUnavailable("Database unavailable.".to_string())
        })?;

    Ok(HttpResponse::Ok().json(json!({ "status": "ready", "database": "ok" })))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/health/ready", web::get().to(readiness_check));
}

#[cfg(test)]
mod tests {
    use crate::handlers::test_support::{test_app, TestState};
    use actix_web::http::StatusCode;
    use actix_web::test;
    use serde_json::Value;

    #[actix_web::test]
    async fn test_health_check() {
        let state = TestState::new();
        let app = test_app!(state);

        let req = test::TestRequest::get().uri("/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "storefront");
    }

    #[actix_web::test]
    async fn test_readiness_without_database() {
        let state = TestState::new();
        let app = test_app!(state);

        let req = test::TestRequest::get().uri("/health/ready").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
