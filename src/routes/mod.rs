//! HTTP route handlers.

pub mod admin;
pub mod auth;
pub mod share;

use crate::auth::edge::edge_guard;
use crate::auth::middleware::AppState;
use crate::error::AppError;
use crate::middleware::security_headers;
use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Validate that a string is a valid nanoid (alphanumeric, hyphens, underscores).
pub fn validate_id(id: &str, label: &str, expected_len: usize) -> Result<(), AppError> {
    if id.len() != expected_len
        || !id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(AppError::BadRequest(format!("Invalid {} format", label)));
    }
    Ok(())
}

/// Project slugs: 2-64 chars of `[a-z0-9-]`, no leading or trailing hyphen.
pub fn is_valid_slug(slug: &str) -> bool {
    (2..=64).contains(&slug.len())
        && slug
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
        && !slug.starts_with('-')
        && !slug.ends_with('-')
}

pub fn validate_slug(slug: &str) -> Result<(), AppError> {
    if !is_valid_slug(slug) {
        return Err(AppError::BadRequest(
            "Slug must be 2-64 characters of lowercase letters, digits and hyphens".to_string(),
        ));
    }
    Ok(())
}

/// Build the router with all endpoints.
pub fn api_router() -> Router<AppState> {
    Router::new()
        // Login surface (login page is exempt from the edge guard)
        .route("/admin/login", get(auth::login_page).post(auth::login))
        .route("/admin/logout", post(auth::logout))
        // Admin API
        .route("/admin", get(admin::index))
        .route(
            "/admin/api/projects",
            get(admin::list_projects).post(admin::create_project),
        )
        .route(
            "/admin/api/projects/{slug}",
            get(admin::get_project).delete(admin::delete_project),
        )
        .route(
            "/admin/api/projects/{slug}/items",
            post(admin::add_item),
        )
        .route(
            "/admin/api/projects/{slug}/items/{item_id}",
            put(admin::update_item).delete(admin::delete_item),
        )
        .route(
            "/admin/api/projects/{slug}/share-token",
            get(admin::share_token),
        )
        // Public share links
        .route("/share/{slug}/{token}", get(share::view_shared))
}

/// Full application: routes, edge guard and response hardening.
///
/// The edge guard runs inside the security-headers layer so redirects
/// carry the same headers as normal responses.
pub fn app(state: AppState) -> Router {
    // Explicit CORS: deny all cross-origin requests (single-origin deployment).
    let cors = CorsLayer::new();

    api_router()
        .layer(axum::middleware::from_fn(edge_guard))
        .layer(cors)
        .layer(axum::middleware::from_fn(security_headers))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
