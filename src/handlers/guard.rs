// src/handlers/guard.rs
// DOCUMENTATION: Request guards shared by handlers
// PURPOSE: Session cookie, admin authentication, CSRF checks and path parsing

use crate::config::Config;
use crate::errors::StoreError;
use crate::services::{AdminSession, SessionStore};
use actix_web::cookie::{Cookie, SameSite};
use actix_web::{HttpRequest, HttpResponse};
use std::net::{IpAddr, Ipv4Addr};

pub const CSRF_HEADER: &str = "X-CSRF-Token";

/// Session id carried by the admin cookie, if any
pub fn session_id(req: &HttpRequest, config: &Config) -> Option<String> {
    req.cookie(&config.session_cookie_name)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}

/// Require a logged-in admin
pub async fn require_admin(
    req: &HttpRequest,
    config: &Config,
    sessions: &SessionStore,
) -> Result<AdminSession, StoreError> {
    let session_id = session_id(req, config).ok_or_else(|| {
        log::debug!("Admin request without session cookie: {}", req.path());
        StoreError::Unauthorized
    })?;

    sessions.authenticate(&session_id).await
}

/// Require a logged-in admin and a valid X-CSRF-Token header
pub async fn require_admin_csrf(
    req: &HttpRequest,
    config: &Config,
    sessions: &SessionStore,
) -> Result<AdminSession, StoreError> {
    let admin = require_admin(req, config, sessions).await?;

    let provided = req
        .headers()
        .get(CSRF_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::trim);
    sessions.validate_csrf(&admin.session_id, provided).await?;

    Ok(admin)
}

/// HttpOnly, SameSite=Strict session cookie
pub fn session_cookie(config: &Config, session_id: String) -> Cookie<'static> {
    Cookie::build(config.session_cookie_name.clone(), session_id)
        .path("/")
        .http_only(true)
        .secure(config.session_cookie_secure)
        .same_site(SameSite::Strict)
        .finish()
}

/// Cookie that makes the browser drop the session
pub fn removal_cookie(config: &Config) -> Cookie<'static> {
    let mut cookie = session_cookie(config, String::new());
    cookie.make_removal();
    cookie
}

/// Peer address of the client; unknown peers share one bucket
pub fn client_ip(req: &HttpRequest) -> IpAddr {
    req.peer_addr()
        .map(|addr| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
}

/// Parse a positive numeric id from the URL
pub fn parse_id(raw: &str, what: &str) -> Result<i64, StoreError> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| StoreError::InvalidInput(format!("Invalid {} ID", what)))
}

/// Default service for known paths: 405, or 204 for CORS preflight
pub async fn method_not_allowed(req: HttpRequest) -> Result<HttpResponse, StoreError> {
    if req.method() == actix_web::http::Method::OPTIONS {
        return Ok(HttpResponse::NoContent().finish());
    }
    Err(StoreError::MethodNotAllowed)
}
