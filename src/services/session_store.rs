// src/services/session_store.rs
// DOCUMENTATION: In-memory admin session store
// PURPOSE: Session idle timeout plus per-session CSRF tokens

use crate::errors::StoreError;
use rand::RngCore;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// Random bytes behind session ids and CSRF tokens (256 bits)
const TOKEN_BYTES: usize = 32;

#[derive(Clone, Debug)]
struct CsrfToken {
    value: String,
    expires_at: Instant,
}

impl CsrfToken {
    fn generate(ttl: Duration) -> Self {
        Self {
            value: random_token(),
            expires_at: Instant::now() + ttl,
        }
    }

    fn is_expired(&self) -> bool {
        Instant::now() > self.expires_at
    }
}

/// Server-side admin session
#[derive(Clone, Debug)]
struct SessionEntry {
    admin_id: i64,
    username: String,
    last_activity: Instant,
    csrf: Option<CsrfToken>,
}

impl SessionEntry {
    fn is_idle(&self, timeout: Duration) -> bool {
        self.last_activity.elapsed() > timeout
    }
}

/// Authenticated admin, as seen by handlers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminSession {
    pub session_id: String,
    pub admin_id: i64,
    pub username: String,
}

/// Thread-safe session store with idle expiry
/// DOCUMENTATION: Shared across workers through web::Data<Arc<SessionStore>>
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, SessionEntry>>>,
    idle_timeout: Duration,
    csrf_ttl: Duration,
}

impl SessionStore {
    pub fn new(idle_timeout: Duration, csrf_ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            idle_timeout,
            csrf_ttl,
        }
    }

    /// Start a new session after a successful login.
    /// Any session named by `previous` is destroyed so a planted id never becomes authenticated.
    /// Returns (session id, CSRF token).
    pub async fn create(
        &self,
        admin_id: i64,
        username: &str,
        previous: Option<&str>,
    ) -> (String, String) {
        let session_id = random_token();
        let csrf = CsrfToken::generate(self.csrf_ttl);
        let csrf_value = csrf.value.clone();

        let mut sessions = self.sessions.write().await;
        if let Some(old) = previous {
            sessions.remove(old);
        }
        sessions.insert(
            session_id.clone(),
            SessionEntry {
                admin_id,
                username: username.to_string(),
                last_activity: Instant::now(),
                csrf: Some(csrf),
            },
        );

        log::info!("Admin session started for {}", username);
        (session_id, csrf_value)
    }

    /// Require a live session: touches last activity, destroys it when idle
    pub async fn authenticate(&self, session_id: &str) -> Result<AdminSession, StoreError> {
        let mut sessions = self.sessions.write().await;

        let entry = sessions.get_mut(session_id).ok_or(StoreError::Unauthorized)?;
        if entry.is_idle(self.idle_timeout) {
            log::info!("Admin session for {} expired after inactivity", entry.username);
            sessions.remove(session_id);
            return Err(StoreError::Unauthorized);
        }

        entry.last_activity = Instant::now();
        Ok(AdminSession {
            session_id: session_id.to_string(),
            admin_id: entry.admin_id,
            username: entry.username.clone(),
        })
    }

    /// Same as `authenticate` but without failing the request
    pub async fn peek(&self, session_id: &str) -> Option<AdminSession> {
        self.authenticate(session_id).await.ok()
    }

    /// Current CSRF token; regenerated when missing or expired, expiry pushed forward
    pub async fn csrf_token(&self, session_id: &str) -> Result<String, StoreError> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions.get_mut(session_id).ok_or(StoreError::Unauthorized)?;

        let csrf_ttl = self.csrf_ttl;
        let token = match entry.csrf.take() {
            Some(mut token) if !token.is_expired() => {
                token.expires_at = Instant::now() + csrf_ttl;
                token
            }
            _ => CsrfToken::generate(csrf_ttl),
        };

        let value = token.value.clone();
        entry.csrf = Some(token);
        Ok(value)
    }

    /// Check the token sent in X-CSRF-Token
    /// DOCUMENTATION: 401 without session, 419 when the token is gone or stale, 403 on mismatch
    pub async fn validate_csrf(
        &self,
        session_id: &str,
        provided: Option<&str>,
    ) -> Result<(), StoreError> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions.get_mut(session_id).ok_or(StoreError::Unauthorized)?;

        let token = match entry.csrf.as_mut() {
            Some(token) if !token.is_expired() => token,
            _ => {
                log::warn!("Stale CSRF token for admin {}", entry.username);
                return Err(StoreError::CsrfExpired);
            }
        };

        let provided = provided.unwrap_or_default();
        if provided.is_empty() || !constant_time_eq(token.value.as_bytes(), provided.as_bytes()) {
            log::warn!("CSRF token mismatch for admin {}", entry.username);
            return Err(StoreError::Forbidden("Invalid CSRF token.".to_string()));
        }

        token.expires_at = Instant::now() + self.csrf_ttl;
        Ok(())
    }

    /// Logout
    pub async fn destroy(&self, session_id: &str) -> bool {
        let removed = self.sessions.write().await.remove(session_id);
        if let Some(entry) = &removed {
            log::info!("Admin session ended for {}", entry.username);
        }
        removed.is_some()
    }

    /// Clear idle sessions
    pub async fn cleanup(&self) {
        let mut sessions = self.sessions.write().await;
        let before_count = sessions.len();
        sessions.retain(|_, entry| !entry.is_idle(self.idle_timeout));
        let after_count = sessions.len();

        if before_count > after_count {
            log::info!(
                "Session cleanup: removed {} idle sessions ({} remaining)",
                before_count - after_count,
                after_count
            );
        }
    }

    pub async fn active_sessions(&self) -> usize {
        self.sessions.read().await.len()
    }

    #[cfg(test)]
    async fn expire_csrf(&self, session_id: &str) {
        if let Some(entry) = self.sessions.write().await.get_mut(session_id) {
            if let Some(token) = entry.csrf.as_mut() {
                token.expires_at = Instant::now() - Duration::from_secs(1);
            }
        }
    }
}

/// 32 random bytes, hex encoded
fn random_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Compare without short-circuiting on the first differing byte
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Start background cleanup task
/// DOCUMENTATION: Periodically removes idle sessions
pub fn start_session_cleanup(store: Arc<SessionStore>, interval_seconds: u64) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(interval_seconds));

        loop {
            interval.tick().await;
            store.cleanup().await;
        }
    });
}
