//! Admin API endpoints (all require AdminSession).

use crate::auth::middleware::{AdminSession, AppState};
use crate::auth::session::now_millis;
use crate::error::AppError;
use crate::models::{
    AddItemRequest, ChecklistItem, CreateProjectRequest, ItemStatus, Project, ProjectSummary,
    ShareTokenResponse, UpdateItemRequest,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

const MAX_NAME_LEN: usize = 200;
const MAX_TITLE_LEN: usize = 500;
const MAX_NOTE_LEN: usize = 2000;
const ITEM_ID_LEN: usize = 12;

fn required_text(value: &str, label: &str, max_len: usize) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.len() > max_len {
        return Err(AppError::BadRequest(format!(
            "{} must be 1-{} characters",
            label, max_len
        )));
    }
    Ok(trimmed.to_string())
}

fn optional_text(
    value: Option<String>,
    label: &str,
    max_len: usize,
) -> Result<Option<String>, AppError> {
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => required_text(v, label, max_len).map(Some),
    }
}

async fn load_project(state: &AppState, slug: &str) -> Result<Project, AppError> {
    super::validate_slug(slug)?;
    state
        .store
        .get_project(slug)
        .await?
        .ok_or_else(|| AppError::NotFound("Project not found".to_string()))
}

fn summaries(projects: Vec<Project>) -> Vec<ProjectSummary> {
    projects.iter().map(Project::summary).collect()
}

/// GET /admin — Admin index
pub async fn index(
    session: AdminSession,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let projects = state.store.list_projects().await?;

    Ok(Json(serde_json::json!({
        "session_issued_at": session.issued_at_ms,
        "projects": summaries(projects),
    })))
}

/// GET /admin/api/projects — List projects
pub async fn list_projects(
    _session: AdminSession,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let projects = state.store.list_projects().await?;
    Ok(Json(summaries(projects)))
}

/// POST /admin/api/projects — Create project
pub async fn create_project(
    _session: AdminSession,
    State(state): State<AppState>,
    Json(req): Json<CreateProjectRequest>,
) -> Result<impl IntoResponse, AppError> {
    super::validate_slug(&req.slug)?;
    let name = required_text(&req.name, "Name", MAX_NAME_LEN)?;
    let client = optional_text(req.client, "Client", MAX_NAME_LEN)?;

    let project = Project::new(&req.slug, &name, client, now_millis());

    if !state.store.create_project(&project).await? {
        return Err(AppError::Conflict(format!(
            "Project '{}' already exists",
            req.slug
        )));
    }

    tracing::info!(action = "project_created", slug = %project.slug, "Admin created project");

    Ok((StatusCode::CREATED, Json(project)))
}

/// GET /admin/api/projects/:slug — Project with checklist
pub async fn get_project(
    _session: AdminSession,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let project = load_project(&state, &slug).await?;
    Ok(Json(project))
}

/// DELETE /admin/api/projects/:slug — Delete project
pub async fn delete_project(
    _session: AdminSession,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    super::validate_slug(&slug)?;

    if !state.store.delete_project(&slug).await? {
        return Err(AppError::NotFound("Project not found".to_string()));
    }

    tracing::warn!(action = "project_deleted", slug = %slug, "Admin deleted project");

    Ok(StatusCode::NO_CONTENT)
}

/// POST /admin/api/projects/:slug/items — Add checklist item
pub async fn add_item(
    _session: AdminSession,
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(req): Json<AddItemRequest>,
) -> Result<impl IntoResponse, AppError> {
    let title = required_text(&req.title, "Title", MAX_TITLE_LEN)?;
    let mut project = load_project(&state, &slug).await?;

    if project.items.len() >= state.config.max_items_per_project {
        return Err(AppError::BadRequest(format!(
            "Project already has the maximum of {} items",
            state.config.max_items_per_project
        )));
    }

    let item = ChecklistItem {
        id: nanoid::nanoid!(ITEM_ID_LEN),
        title,
        status: ItemStatus::Pending,
        note: None,
        updated_at: now_millis(),
    };
    project.items.push(item.clone());
    state.store.save_project(&project).await?;

    tracing::info!(action = "item_added", slug = %slug, item_id = %item.id, "Admin added checklist item");

    Ok((StatusCode::CREATED, Json(item)))
}

/// PUT /admin/api/projects/:slug/items/:item_id — Record item result
pub async fn update_item(
    _session: AdminSession,
    State(state): State<AppState>,
    Path((slug, item_id)): Path<(String, String)>,
    Json(req): Json<UpdateItemRequest>,
) -> Result<impl IntoResponse, AppError> {
    super::validate_id(&item_id, "item ID", ITEM_ID_LEN)?;
    let note = optional_text(req.note, "Note", MAX_NOTE_LEN)?;
    let mut project = load_project(&state, &slug).await?;

    let item = project
        .item_mut(&item_id)
        .ok_or_else(|| AppError::NotFound("Item not found".to_string()))?;
    item.status = req.status;
    item.note = note;
    item.updated_at = now_millis();
    let item = item.clone();

    state.store.save_project(&project).await?;

    tracing::info!(
        action = "item_updated",
        slug = %slug,
        item_id = %item_id,
        status = ?item.status,
        "Admin updated checklist item"
    );

    Ok(Json(item))
}

/// DELETE /admin/api/projects/:slug/items/:item_id — Remove item
pub async fn delete_item(
    _session: AdminSession,
    State(state): State<AppState>,
    Path((slug, item_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    super::validate_id(&item_id, "item ID", ITEM_ID_LEN)?;
    let mut project = load_project(&state, &slug).await?;

    let before = project.items.len();
    project.items.retain(|item| item.id != item_id);
    if project.items.len() == before {
        return Err(AppError::NotFound("Item not found".to_string()));
    }

    state.store.save_project(&project).await?;

    tracing::info!(action = "item_deleted", slug = %slug, item_id = %item_id, "Admin deleted checklist item");

    Ok(StatusCode::NO_CONTENT)
}

/// GET /admin/api/projects/:slug/share-token — Share token for analytics link
pub async fn share_token(
    _session: AdminSession,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let project = load_project(&state, &slug).await?;
    let token = state.shares.issue_for(&project.slug);

    tracing::info!(action = "share_token_issued", slug = %project.slug, "Admin retrieved share token");

    Ok(Json(ShareTokenResponse { token }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text() {
        assert_eq!(required_text("  hi  ", "Name", 10).unwrap(), "hi");
        assert!(required_text("   ", "Name", 10).is_err());
        assert!(required_text(&"x".repeat(11), "Name", 10).is_err());
    }

    #[test]
    fn test_optional_text() {
        assert_eq!(optional_text(None, "Note", 10).unwrap(), None);
        assert_eq!(optional_text(Some("  ".to_string()), "Note", 10).unwrap(), None);
        assert_eq!(
            optional_text(Some(" ok ".to_string()), "Note", 10).unwrap(),
            Some("ok".to_string())
        );
        assert!(optional_text(Some("x".repeat(11)), "Note", 10).is_err());
    }
}
