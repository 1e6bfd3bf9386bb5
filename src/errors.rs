// src/errors.rs
// DOCUMENTATION: Custom error types and HTTP responses
// PURPOSE: Centralized error handling for entire application

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use thiserror::Error;

/// Application-specific error types
/// DOCUMENTATION: Comprehensive error enum for all possible failures
/// Each variant maps to appropriate HTTP status code and error response
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{0}")]
    NotFound(String),

    /// Internal detail is logged, clients only see a generic message
    #[error("Database error")]
    DatabaseError(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    ValidationError(String),

    #[error("Unauthorized. Please login.")]
    Unauthorized,

    #[error("Invalid username or password.")]
    InvalidCredentials,

    #[error("{0}")]
    Forbidden(String),

    #[error("CSRF token expired. Please refresh and try again.")]
    CsrfExpired,

    #[error("Internal server error")]
    InternalError,

    #[error("External API error: {0}")]
    ExternalApiError(String),

    #[error("Too many requests. Please wait and try again.")]
    RateLimitExceeded,

    #[error("{0}")]
    ServiceUnavailable(String),

    #[error("Method not allowed.")]
    MethodNotAllowed,
}

impl StoreError {
    fn code(&self) -> &'static str {
        match self {
            StoreError::NotFound(_) => "NOT_FOUND",
            StoreError::DatabaseError(_) => "DATABASE_ERROR",
            StoreError::InvalidInput(_) => "INVALID_INPUT",
            StoreError::ValidationError(_) => "VALIDATION_ERROR",
            StoreError::Unauthorized => "UNAUTHORIZED",
            StoreError::InvalidCredentials => "INVALID_CREDENTIALS",
            StoreError::Forbidden(_) => "FORBIDDEN",
            StoreError::CsrfExpired => "CSRF_EXPIRED",
            StoreError::InternalError => "INTERNAL_ERROR",
            StoreError::ExternalApiError(_) => "EXTERNAL_API_ERROR",
            StoreError::RateLimitExceeded => "RATE_LIMIT_EXCEEDED",
            StoreError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
            StoreError::MethodNotAllowed => "METHOD_NOT_ALLOWED",
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::DatabaseError(e.to_string())
    }
}

/// Convert StoreError to HTTP response
/// DOCUMENTATION: Maps error types to HTTP status codes and JSON responses
impl ResponseError for StoreError {
    fn error_response(&self) -> HttpResponse {
        let body = json!({
            "success": false,
            "error": {
                "code": self.code(),
                "message": self.to_string(),
                "timestamp": chrono::Utc::now().to_rfc3339()
            }
        });

        HttpResponse::build(self.status_code()).json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            StoreError::NotFound(_) => StatusCode::NOT_FOUND,
            StoreError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            StoreError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            StoreError::ValidationError(_) => StatusCode::BAD_REQUEST,
            StoreError::Unauthorized | StoreError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            StoreError::Forbidden(_) => StatusCode::FORBIDDEN,
            // 419 has no named constant; the admin UI treats it as "reload the token"
            StoreError::CsrfExpired => {
                StatusCode::from_u16(419).unwrap_or(StatusCode::FORBIDDEN)
            }
            StoreError::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
            StoreError::ExternalApiError(_) => StatusCode::BAD_GATEWAY,
            StoreError::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
            StoreError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            StoreError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        }
    }
}
