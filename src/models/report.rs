// src/models/report.rs
// DOCUMENTATION: Sales report data structures
// PURPOSE: Aggregates returned by GET /api/admin/reports

use crate::errors::StoreError;
use crate::models::input::non_empty;
use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const DEFAULT_REPORT_DAYS: i64 = 7;
pub const MAX_REPORT_DAYS: i64 = 365;

/// Overall order statistics
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct SalesStats {
    pub total_orders: i64,
    pub total_sales: f64,
    pub avg_order_value: f64,
    pub completed_orders: i64,
}

/// One bar of the daily sales chart
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct DailySales {
    pub date: NaiveDate,
    pub orders: i64,
    pub sales: f64,
}

/// One bar of the monthly sales chart, month formatted as YYYY-MM
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct MonthlySales {
    pub month: String,
    pub orders: i64,
    pub sales: f64,
}

/// Query string for the reports endpoint
#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    #[serde(rename = "type")]
    pub report_type: Option<String>,
    pub days: Option<i64>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Half-open time window `[start, end)` applied to the overview stats
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DateRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReportRequest {
    Overview(DateRange),
    Daily { days: i64 },
    Monthly,
}

impl ReportQuery {
    pub fn into_request(self) -> Result<ReportRequest, StoreError> {
        match non_empty(&self.report_type).unwrap_or("overview") {
            "overview" => {
                let start = match non_empty(&self.start_date) {
                    Some(s) => Some(parse_bound(s, false)?),
                    None => None,
                };
                let end = match non_empty(&self.end_date) {
                    Some(s) => Some(parse_bound(s, true)?),
                    None => None,
                };
                Ok(ReportRequest::Overview(DateRange { start, end }))
            }
            "daily" => Ok(ReportRequest::Daily {
                days: self
                    .days
                    .unwrap_or(DEFAULT_REPORT_DAYS)
                    .clamp(1, MAX_REPORT_DAYS),
            }),
            "monthly" => Ok(ReportRequest::Monthly),
            _ => Err(StoreError::InvalidInput("Invalid report type".to_string())),
        }
    }
}

/// Accepts RFC 3339 timestamps or plain `YYYY-MM-DD` dates.
/// A plain end date covers that whole day.
fn parse_bound(value: &str, is_end: bool) -> Result<DateTime<Utc>, StoreError> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Ok(ts.with_timezone(&Utc));
    }

    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| StoreError::InvalidInput(format!("Invalid date: {}", value)))?;
    let date = if is_end {
        date.checked_add_days(Days::new(1))
            .ok_or_else(|| StoreError::InvalidInput(format!("Invalid date: {}", value)))?
    } else {
        date
    };

    Ok(date.and_time(chrono::NaiveTime::MIN).and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(report_type: Option<&str>) -> ReportQuery {
        ReportQuery {
            report_type: report_type.map(str::to_string),
            ..ReportQuery::default()
        }
    }

    #[test]
    fn test_default_is_overview() {
        assert_eq!(
            query(None).into_request().unwrap(),
            ReportRequest::Overview(DateRange::default())
        );
    }

    #[test]
    fn test_daily_days_clamped() {
        let req = ReportQuery {
            days: Some(1000),
            ..query(Some("daily"))
        };
        assert_eq!(req.into_request().unwrap(), ReportRequest::Daily { days: 365 });

        let req = ReportQuery {
            days: Some(-3),
            ..query(Some("daily"))
        };
        assert_eq!(req.into_request().unwrap(), ReportRequest::Daily { days: 1 });

        assert_eq!(
            query(Some("daily")).into_request().unwrap(),
            ReportRequest::Daily { days: 7 }
        );
    }

    #[test]
    fn test_unknown_type_rejected() {
        let err = query(Some("yearly")).into_request().unwrap_err();
        assert_eq!(err.to_string(), "Invalid report type");
    }

    #[test]
    fn test_overview_date_bounds() {
        let req = ReportQuery {
            start_date: Some("2024-03-01".to_string()),
            end_date: Some("2024-03-31".to_string()),
            ..query(Some("overview"))
        };
        let ReportRequest::Overview(range) = req.into_request().unwrap() else {
            panic!("expected overview");
        };
        assert_eq!(range.start.unwrap().to_rfc3339(), "2024-03-01T00:00:00+00:00");
        assert_eq!(range.end.unwrap().to_rfc3339(), "2024-04-01T00:00:00+00:00");
    }

    #[test]
    fn test_rfc3339_bound_and_garbage() {
        let parsed = parse_bound("2024-03-01T10:00:00+07:00", false).unwrap();
        assert_eq!(parsed.to_rfc3339(), "2024-03-01T03:00:00+00:00");
        assert!(parse_bound("last tuesday", false).is_err());
    }
}
