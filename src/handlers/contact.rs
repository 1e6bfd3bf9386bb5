// src/handlers/contact.rs
// DOCUMENTATION: Storefront contact form
// PURPOSE: Validate, rate limit and forward visitor messages to Telegram

use crate::errors::StoreError;
use crate::handlers::guard::{client_ip, method_not_allowed};
use crate::models::ContactRequest;
use crate::services::{ContactLimiter, Notifier};
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use serde_json::json;
use std::sync::Arc;

/// POST /api/contact
/// DOCUMENTATION: Every submission counts against the client's hourly quota.
/// Answers success once the message is valid, even if Telegram is down
pub async fn submit_contact(
    req: HttpRequest,
    limiter: web::Data<Arc<ContactLimiter>>,
    notifier: web::Data<Notifier>,
    body: web::Json<ContactRequest>,
) -> Result<impl Responder, StoreError> {
    if !limiter.check(client_ip(&req)) {
        return Err(StoreError::RateLimitExceeded);
    }

    let message = body.into_inner().into_message()?;

    if !notifier.contact_message(&message).await {
        log::warn!("Contact message from {} was not delivered", message.email);
    }

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Thank you for your message. We will get back to you soon."
    })))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/contact")
            .route(web::post().to(submit_contact))
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
    async fn test_contact_requires_fields() {
        let state = TestState::new();
        let app = test_app!(state);

        let req = test::TestRequest::post()
            .uri("/api/contact")
            .set_json(json!({ "name": "Nok", "email": "nok@example.com" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_contact_rejects_bad_phone() {
        let state = TestState::new();
        let app = test_app!(state);

        let req = test::TestRequest::post()
            .uri("/api/contact")
            .set_json(json!({
                "name": "Nok",
                "email": "nok@example.com",
                "subject": "Hi",
                "message": "Hello",
                "phone": "<script>"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["message"], "Invalid phone number format.");
    }

    #[actix_web::test]
    async fn test_contact_rate_limited() {
        let state = TestState::with_contact_limit(1);
        let app = test_app!(state);
        let peer = "203.0.113.9:40000".parse().unwrap();

        // use up the quota for this client
        assert!(state.limiter.check("203.0.113.9".parse().unwrap()));

        let req = test::TestRequest::post()
            .uri("/api/contact")
            .peer_addr(peer)
            .set_json(json!({
                "name": "Nok",
                "email": "nok@example.com",
                "subject": "Hi",
                "message": "Hello"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[actix_web::test]
    async fn test_limit_checked_before_validation() {
        let state = TestState::with_contact_limit(1);
        let app = test_app!(state);
        let peer = "203.0.113.10:40000".parse().unwrap();

        let first = test::TestRequest::post()
            .uri("/api/contact")
            .peer_addr(peer)
            .set_json(json!({ "name": "Nok" }))
            .to_request();
        let resp = test::call_service(&app, first).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let second = test::TestRequest::post()
            .uri("/api/contact")
            .peer_addr(peer)
            .set_json(json!({ "name": "Nok" }))
            .to_request();
        let resp = test::call_service(&app, second).await;
        assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], "RATE_LIMIT_EXCEEDED");
    }
}
