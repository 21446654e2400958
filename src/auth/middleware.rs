//! Shared state, the trusted admin extractor and rate limiting.

use super::session::{now_millis, SessionAuthority, SESSION_COOKIE};
use super::share::ShareTokens;
use super::signer::Signer;
use super::AuthError;
use crate::config::Config;
use crate::error::AppError;
use crate::storage::ProjectStore;
use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::CookieJar;
use std::hash::{Hash, Hasher};
use std::net::IpAddr;
use std::sync::Arc;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ProjectStore>,
    pub config: Arc<Config>,
    pub sessions: Arc<SessionAuthority>,
    pub shares: Arc<ShareTokens>,
}

impl AppState {
    /// Build state from loaded config. Fails if the signing secret is unusable.
    pub fn new(config: Config, store: Arc<dyn ProjectStore>) -> Result<Self, AuthError> {
        let signer = Arc::new(Signer::new(&config.session_secret)?);
        let sessions = SessionAuthority::new(signer.clone(), config.admin_password.clone());

        Ok(AppState {
            store,
            config: Arc::new(config),
            sessions: Arc::new(sessions),
            shares: Arc::new(ShareTokens::new(signer)),
        })
    }
}

/// Fully verified admin session.
///
/// Every privileged handler takes this as a parameter. The signature is
/// recomputed on each request, so a cookie that only passed the edge guard
/// is rejected here with 401 before the handler body runs.
#[derive(Debug)]
pub struct AdminSession {
    pub issued_at_ms: u64,
}

impl FromRequestParts<AppState> for AdminSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let raw = jar
            .get(SESSION_COOKIE)
            .map(|c| c.value().to_string())
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

        match state.sessions.check_full(&raw, now_millis()) {
            Ok(credential) => Ok(AdminSession {
                issued_at_ms: credential.issued_at_ms,
            }),
            Err(reason) => {
                tracing::warn!(
                    action = "session_rejected",
                    layer = "trusted",
                    reason = reason.as_str(),
                    path = %parts.uri.path(),
                    "Session failed full verification"
                );
                Err(AppError::Unauthorized("Authentication required".to_string()))
            }
        }
    }
}

/// Hash an IP for logging so raw addresses stay out of the logs.
pub fn ip_hash(ip: &IpAddr) -> String {
    let mut hasher = std::hash::DefaultHasher::new();
    ip.hash(&mut hasher);
    format!("{:x}", hasher.finish())
}

/// Per-IP fixed-window rate limit for one endpoint, 60 s window.
pub async fn check_rate_limit(
    state: &AppState,
    endpoint: &str,
    ip: IpAddr,
    max: u32,
) -> Result<(), AppError> {
    let key = format!("{}:{}", endpoint, ip);
    let allowed = state
        .store
        .hit_rate_limit(&key, max, 60)
        .await
        .map_err(|e| AppError::Internal(format!("Rate limit check failed: {}", e)))?;

    if !allowed {
        tracing::warn!(
            action = "rate_limited",
            endpoint = %endpoint,
            ip_hash = %ip_hash(&ip),
            "Rate limit exceeded"
        );
        return Err(AppError::RateLimited);
    }
    Ok(())
}
