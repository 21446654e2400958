//! Security headers middleware.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};

/// Middleware that adds security headers to all responses.
///
/// - **Cache-Control: no-store** — admin pages and shared analytics must not
///   land in shared caches.
/// - **Referrer-Policy: no-referrer** — share URLs carry the token in the
///   path; it must not leak through the Referer header.
/// - **X-Content-Type-Options / X-Frame-Options** — no sniffing, no framing.
/// - **Strict-Transport-Security** — the session cookie is only safe over TLS.
/// - **Content-Security-Policy** — same-origin only; the login form may only
///   post back to this origin.
pub async fn security_headers(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert("cache-control", HeaderValue::from_static("no-store"));
    headers.insert("referrer-policy", HeaderValue::from_static("no-referrer"));
    headers.insert(
        "x-content-type-options",
        HeaderValue::from_static("nosniff"),
    );
    headers.insert("x-frame-options", HeaderValue::from_static("DENY"));
    headers.insert(
        "strict-transport-security",
        HeaderValue::from_static("max-age=63072000; includeSubDomains"),
    );
    headers.insert(
        "content-security-policy",
        HeaderValue::from_static(
            "default-src 'self'; \
             script-src 'self'; \
             object-src 'none'; \
             frame-ancestors 'none'; \
             base-uri 'self'; \
             form-action 'self'",
        ),
    );

    response
}
