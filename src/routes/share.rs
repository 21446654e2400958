//! Public analytics view behind share links.

use crate::auth::middleware::AppState;
use crate::error::AppError;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};

fn not_found() -> AppError {
    AppError::NotFound("Not found".to_string())
}

/// GET /share/:slug/:token — Read-only project analytics
///
/// The token is checked before any lookup, and a bad token looks exactly
/// like a missing project.
pub async fn view_shared(
    State(state): State<AppState>,
    Path((slug, token)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    if !state.shares.verify_for(&slug, &token) {
        tracing::info!(action = "share_rejected", "Share token verification failed");
        return Err(not_found());
    }

    let project = state.store.get_project(&slug).await?.ok_or_else(not_found)?;

    Ok(Json(project.analytics()))
}
