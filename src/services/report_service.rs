// src/services/report_service.rs
// DOCUMENTATION: Sales reports for the admin dashboard
// PURPOSE: Dispatch report types to the order aggregates

use crate::db::OrderRepository;
use crate::errors::StoreError;
use crate::models::{ReportQuery, ReportRequest, DEFAULT_REPORT_DAYS};
use serde_json::{json, Value};
use sqlx::PgPool;

pub struct ReportService;

impl ReportService {
    /// Build the JSON body for GET /api/admin/reports
    pub async fn report(pool: &PgPool, query: ReportQuery) -> Result<Value, StoreError> {
        match query.into_request()? {
            ReportRequest::Overview(range) => {
                let stats = OrderRepository::sales_stats(pool, &range).await?;
                let daily = OrderRepository::daily_sales(pool, DEFAULT_REPORT_DAYS).await?;
                Ok(json!({ "stats": stats, "dailySales": daily }))
            }
            ReportRequest::Daily { days } => {
                let daily = OrderRepository::daily_sales(pool, days).await?;
                Ok(json!({ "dailySales": daily }))
            }
            ReportRequest::Monthly => {
                let monthly = OrderRepository::monthly_sales(pool).await?;
                Ok(json!({ "monthlySales": monthly }))
            }
        }
    }
}
