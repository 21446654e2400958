//! Edge guard for the `/admin` prefix.
//!
//! Runs before routing to handlers and rejects requests whose session
//! cookie is missing, malformed or stale. It never touches the signing
//! secret: a cookie that passes here can still be forged, so every admin
//! handler re-verifies through [`AdminSession`](super::AdminSession).

use super::session::{check_shallow, now_millis, SESSION_COOKIE};
use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;

/// Protected path prefix.
pub const ADMIN_PREFIX: &str = "/admin";

/// Login entry point, exempt from the guard.
pub const LOGIN_PATH: &str = "/admin/login";

/// Outcome of the edge check for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeDecision {
    /// Path is outside the protected prefix.
    Unprotected,
    /// Login entry point.
    Exempt,
    /// Shallow check passed; handlers still verify fully.
    Forward,
    /// Send the client to the login page.
    Redirect,
}

fn is_protected(path: &str) -> bool {
    path == ADMIN_PREFIX
        || path
            .strip_prefix(ADMIN_PREFIX)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// Decide what to do with a request given its path and session cookie.
pub fn decide(path: &str, cookie: Option<&str>, now_ms: u64) -> EdgeDecision {
    if !is_protected(path) {
        return EdgeDecision::Unprotected;
    }
    if path == LOGIN_PATH {
        return EdgeDecision::Exempt;
    }

    let Some(raw) = cookie else {
        tracing::debug!(path = %path, "No session cookie, redirecting to login");
        return EdgeDecision::Redirect;
    };

    match check_shallow(raw, now_ms) {
        Ok(_) => EdgeDecision::Forward,
        Err(reason) => {
            tracing::info!(
                action = "session_rejected",
                layer = "edge",
                reason = reason.as_str(),
                path = %path,
                "Session cookie rejected at edge"
            );
            EdgeDecision::Redirect
        }
    }
}

/// Axum middleware applying [`decide`] to every request.
pub async fn edge_guard(request: Request, next: Next) -> Response {
    let jar = CookieJar::from_headers(request.headers());
    let cookie = jar.get(SESSION_COOKIE).map(|c| c.value());

    match decide(request.uri().path(), cookie, now_millis()) {
        EdgeDecision::Redirect => Redirect::to(LOGIN_PATH).into_response(),
        EdgeDecision::Unprotected | EdgeDecision::Exempt | EdgeDecision::Forward => {
            next.run(request).await
        }
    }
}
