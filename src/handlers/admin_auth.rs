// src/handlers/admin_auth.rs
// DOCUMENTATION: Admin login/logout and session status
// PURPOSE: Issue and revoke admin sessions, rotate passwords

use crate::config::Config;
use crate::errors::StoreError;
use crate::handlers::guard::{
    method_not_allowed, removal_cookie, require_admin_csrf, session_cookie, session_id,
};
use crate::models::{ChangePasswordRequest, LoginRequest, LoginResponse, SessionStatus};
use crate::services::{AuthService, SessionStore};
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

/// POST /api/admin/login
/// DOCUMENTATION: Always issues a fresh session id; the cookie's previous session is dropped
pub async fn login(
    req: HttpRequest,
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    sessions: web::Data<Arc<SessionStore>>,
    body: web::Json<LoginRequest>,
) -> Result<impl Responder, StoreError> {
    let credentials = body.into_inner().into_credentials()?;
    let admin = AuthService::login(pool.get_ref(), credentials).await?;

    let previous = session_id(&req, &config);
    let (sid, csrf_token) = sessions
        .create(admin.id, &admin.username, previous.as_deref())
        .await;

    Ok(HttpResponse::Ok()
        .cookie(session_cookie(&config, sid))
        .json(LoginResponse {
            success: true,
            message: "Login successful.".to_string(),
            csrf_token,
        }))
}

/// POST /api/admin/logout
pub async fn logout(
    req: HttpRequest,
    config: web::Data<Config>,
    sessions: web::Data<Arc<SessionStore>>,
) -> Result<impl Responder, StoreError> {
    if let Some(sid) = session_id(&req, &config) {
        sessions.destroy(&sid).await;
    }

    Ok(HttpResponse::Ok()
        .cookie(removal_cookie(&config))
        .json(json!({ "success": true, "message": "Logged out." })))
}

/// GET /api/admin/session
/// Lets the admin UI decide between the login form and the dashboard
pub async fn session_status(
    req: HttpRequest,
    config: web::Data<Config>,
    sessions: web::Data<Arc<SessionStore>>,
) -> Result<impl Responder, StoreError> {
    let session = match session_id(&req, &config) {
        Some(sid) => sessions.peek(&sid).await,
        None => None,
    };

    let status = match session {
        Some(session) => SessionStatus {
            authenticated: true,
            csrf_token: Some(sessions.csrf_token(&session.session_id).await?),
            username: Some(session.username),
        },
        None => SessionStatus {
            authenticated: false,
            username: None,
            csrf_token: None,
        },
    };

    Ok(HttpResponse::Ok().json(status))
}

/// POST /api/admin/change-password
pub async fn change_password(
    req: HttpRequest,
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    sessions: web::Data<Arc<SessionStore>>,
    body: web::Json<ChangePasswordRequest>,
) -> Result<impl Responder, StoreError> {
    let admin = require_admin_csrf(&req, &config, &sessions).await?;
    let change = body.into_inner().into_change()?;

    AuthService::change_password(pool.get_ref(), admin.admin_id, change).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Password changed successfully."
    })))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/login")
            .route(web::post().to(login))
            .default_service(web::to(method_not_allowed)),
    )
    .service(
        web::resource("/logout")
            .route(web::post().to(logout))
            .default_service(web::to(method_not_allowed)),
    )
    .service(
        web::resource("/session")
            .route(web::get().to(session_status))
            .default_service(web::to(method_not_allowed)),
    )
    .service(
        web::resource("/change-password")
            .route(web::post().to(change_password))
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
    async fn test_login_missing_fields() {
        let state = TestState::new();
        let app = test_app!(state);

        let req = test::TestRequest::post()
            .uri("/api/admin/login")
            .set_json(json!({ "username": "admin" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_session_status_anonymous() {
        let state = TestState::new();
        let app = test_app!(state);

        let req = test::TestRequest::get().uri("/api/admin/session").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!({ "authenticated": false }));
    }

    #[actix_web::test]
    async fn test_session_status_logged_in() {
        let state = TestState::new();
        let (cookie, csrf) = state.login().await;
        let app = test_app!(state);

        let req = test::TestRequest::get()
            .uri("/api/admin/session")
            .cookie(cookie)
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["authenticated"], true);
        assert_eq!(body["username"], "admin");
        assert_eq!(body["csrfToken"], csrf);
    }

    #[actix_web::test]
    async fn test_logout_destroys_session() {
        let state = TestState::new();
        let (cookie, _) = state.login().await;
        let app = test_app!(state);

        let req = test::TestRequest::post()
            .uri("/api/admin/logout")
            .cookie(cookie.clone())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let removal = resp
            .response()
            .cookies()
            .find(|c| c.name() == "storefront_admin")
            .unwrap();
        assert_eq!(removal.value(), "");
        assert_eq!(state.sessions.active_sessions().await, 0);

        let req = test::TestRequest::get()
            .uri("/api/admin/orders")
            .cookie(cookie)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_change_password_csrf_and_length() {
        let state = TestState::new();
        let (cookie, csrf) = state.login().await;
        let app = test_app!(state);

        let req = test::TestRequest::post()
            .uri("/api/admin/change-password")
            .cookie(cookie.clone())
            .set_json(json!({ "old_password": "admin123", "new_password": "abcdef" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let req = test::TestRequest::post()
            .uri("/api/admin/change-password")
            .cookie(cookie)
            .insert_header(("X-CSRF-Token", csrf))
            .set_json(json!({ "old_password": "admin123", "new_password": "abc" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
