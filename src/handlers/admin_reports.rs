// src/handlers/admin_reports.rs
// DOCUMENTATION: Admin sales reports
// PURPOSE: GET /api/admin/reports?type=overview|daily|monthly

use crate::config::Config;
use crate::errors::StoreError;
use crate::handlers::guard::{method_not_allowed, require_admin};
use crate::models::ReportQuery;
use crate::services::{ReportService, SessionStore};
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use sqlx::PgPool;
use std::sync::Arc;

pub async fn reports(
    req: HttpRequest,
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    sessions: web::Data<Arc<SessionStore>>,
    query: web::Query<ReportQuery>,
) -> Result<impl Responder, StoreError> {
    require_admin(&req, &config, &sessions).await?;

    let report = ReportService::report(pool.get_ref(), query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(report))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/reports")
            .route(web::get().to(reports))
            .default_service(web::to(method_not_allowed)),
    );
}

#[cfg(test)]
mod tests {
    use crate::handlers::test_support::{test_app, TestState};
    use actix_web::http::StatusCode;
    use actix_web::test;
    use serde_json::Value;

    #[actix_web::test]
    async fn test_invalid_report_type() {
        let state = TestState::new();
        let (cookie, _) = state.login().await;
        let app = test_app!(state);

        let req = test::TestRequest::get()
            .uri("/api/admin/reports?type=weekly")
            .cookie(cookie)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["message"], "Invalid report type");
    }

    #[actix_web::test]
    async fn test_reports_require_login() {
        let state = TestState::new();
        let app = test_app!(state);

        let req = test::TestRequest::get()
            .uri("/api/admin/reports?type=daily")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
