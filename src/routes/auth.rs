//! Login and logout.

use crate::auth::edge::{ADMIN_PREFIX, LOGIN_PATH};
use crate::auth::middleware::{check_rate_limit, ip_hash, AppState};
use crate::auth::session::SESSION_COOKIE;
use crate::auth::AuthError;
use crate::error::AppError;
use crate::models::LoginForm;
use axum::{
    extract::{ConnectInfo, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use std::net::SocketAddr;
use zeroize::Zeroizing;

/// Shown for any failed login. There is one account, so nothing more specific.
pub const INVALID_PASSWORD_MESSAGE: &str = "Invalid password";

const LOGIN_HTML: &str = r#"<!doctype html>
<html lang="en">
<head><meta charset="utf-8"><title>Admin login</title></head>
<body>
<h1>Admin login</h1>
{{ERROR}}
<form method="post" action="/admin/login">
<label>Password <input type="password" name="password" autocomplete="current-password" required autofocus></label>
<button type="submit">Sign in</button>
</form>
</body>
</html>
"#;

fn login_html(error: Option<&'static str>) -> String {
    let error_html = error
        .map(|msg| format!(r#"<p role="alert">{}</p>"#, msg))
        .unwrap_or_default();
    LOGIN_HTML.replace("{{ERROR}}", &error_html)
}

fn session_cookie(value: String, secure: bool) -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, value);
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_secure(secure);
    cookie.set_path("/");
    cookie
}

/// GET /admin/login — Login form
pub async fn login_page() -> Html<String> {
    Html(login_html(None))
}

/// POST /admin/login — Check password, set session cookie
pub async fn login(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    check_rate_limit(
        &state,
        "login",
        addr.ip(),
        state.config.rate_limit_login_per_min,
    )
    .await?;

    let password = Zeroizing::new(form.password);

    match state.sessions.issue(&password) {
        Ok(credential) => {
            let cookie = session_cookie(credential.to_string(), state.config.cookie_secure);

            tracing::info!(
                action = "login_success",
                ip_hash = %ip_hash(&addr.ip()),
                issued_at = credential.issued_at_ms,
                "Admin logged in"
            );

            Ok((jar.add(cookie), Redirect::to(ADMIN_PREFIX)).into_response())
        }
        Err(AuthError::InvalidCredentials) => {
            tracing::warn!(
                action = "login_failed",
                ip_hash = %ip_hash(&addr.ip()),
                "Invalid admin password"
            );

            Ok((
                StatusCode::UNAUTHORIZED,
                Html(login_html(Some(INVALID_PASSWORD_MESSAGE))),
            )
                .into_response())
        }
        Err(e) => Err(AppError::Internal(e.to_string())),
    }
}

/// POST /admin/logout — Clear session cookie
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let mut cookie = session_cookie(String::new(), state.config.cookie_secure);
    cookie.make_removal();

    tracing::info!(action = "logout", "Admin logged out");

    (jar.add(cookie), Redirect::to(LOGIN_PATH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_html_without_error() {
        let html = login_html(None);
        assert!(html.contains(r#"name="password""#));
        assert!(!html.contains("{{ERROR}}"));
        assert!(!html.contains(INVALID_PASSWORD_MESSAGE));
    }

    #[test]
    fn test_login_html_with_error() {
        let html = login_html(Some(INVALID_PASSWORD_MESSAGE));
        assert!(html.contains(INVALID_PASSWORD_MESSAGE));
    }

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("123.abc".to_string(), true);
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.value(), "123.abc");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
    }
}
