// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Hackatime project routes.

use crate::error::{AppError, Result};
use crate::models::Project;
use crate::routes::extract::{method_not_allowed, ValidJson, ValidQuery};
use crate::services::hackatime::merge_projects;
use crate::validation::{GITHUB_LINK_RE, HACKATIME_USER_RE, PROJECT_NAME_RE, TOKEN_RE};
use crate::AppState;
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::{Validate, ValidationError};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/addProject",
            post(add_project).fallback(method_not_allowed),
        )
        .route(
            "/api/updateProjectGithub",
            post(update_project_github).fallback(method_not_allowed),
        )
        .route("/api/hackatime", get(hackatime).fallback(method_not_allowed))
}

/// Empty means "no link"; anything else must be a repository URL.
fn github_link_or_empty(link: &str) -> std::result::Result<(), ValidationError> {
    if link.is_empty() || GITHUB_LINK_RE.is_match(link) {
        Ok(())
    } else {
        Err(ValidationError::new("github_link"))
    }
}

// ─── Add Project ─────────────────────────────────────────────

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct AddProjectRequest {
    #[validate(regex(path = *TOKEN_RE))]
    token: String,
    #[validate(regex(path = *PROJECT_NAME_RE))]
    project_name: String,
    #[serde(default)]
    #[validate(custom(function = github_link_or_empty))]
    github_link: String,
}

#[derive(Serialize)]
pub struct ProjectResponse {
    pub message: String,
    pub project: Project,
}

/// Create a project for the caller, or join an existing one with that name.
///
/// Joining is idempotent: a caller already linked is not linked twice.
async fn add_project(
    State(state): State<Arc<AppState>>,
    ValidJson(req): ValidJson<AddProjectRequest>,
) -> Result<Json<ProjectResponse>> {
    let neighbor = state.db.neighbor_by_token(&req.token).await?;

    let existing = state
        .db
        .project_by_name(&req.project_name)
        .await
        .map_err(|e| e.during("Error adding project"))?;

    if let Some(project) = existing {
        let (project, added) = state
            .db
            .add_project_member(project, &neighbor.id)
            .await
            .map_err(|e| e.during("Error adding project"))?;

        tracing::info!(
            project_id = %project.id,
            neighbor_id = %neighbor.id,
            added,
            "Linked neighbor to existing project"
        );
        return Ok(Json(ProjectResponse {
            message: "Project updated successfully".to_string(),
            project,
        }));
    }

    let project = state
        .db
        .create_project(
            &req.project_name,
            &req.github_link,
            &neighbor.id,
        )
        .await
        .map_err(|e| e.during("Error adding project"))?;

    tracing::info!(project_id = %project.id, neighbor_id = %neighbor.id, "Project created");
    Ok(Json(ProjectResponse {
        message: "Project added successfully".to_string(),
        project,
    }))
}

// ─── Update GitHub Link ──────────────────────────────────────

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct UpdateGithubRequest {
    #[validate(regex(path = *TOKEN_RE))]
    token: String,
    #[validate(regex(path = *PROJECT_NAME_RE))]
    project_name: String,
    #[validate(regex(path = *GITHUB_LINK_RE))]
    github_link: String,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Set a project's GitHub link. Only linked neighbors may do this.
async fn update_project_github(
    State(state): State<Arc<AppState>>,
    ValidJson(req): ValidJson<UpdateGithubRequest>,
) -> Result<Json<MessageResponse>> {
    let project = state
        .db
        .project_by_name(&req.project_name)
        .await
        .map_err(|e| e.during("Failed to update GitHub link"))?
        .ok_or_else(|| AppError::NotFound("Project not found".to_string()))?;

    let neighbor = state.db.neighbor_by_token(&req.token).await?;

    if !project.has_member(&neighbor.id) {
        tracing::warn!(
            project_id = %project.id,
            neighbor_id = %neighbor.id,
            "Rejected GitHub link update from non-member"
        );
        return Err(AppError::Forbidden(
            "You are not authorized to update this project".to_string(),
        ));
    }

    state
        .db
        .update_project_github(&project.id, &req.github_link)
        .await
        .map_err(|e| e.during("Failed to update GitHub link"))?;

    Ok(Json(MessageResponse {
        message: "GitHub link updated successfully".to_string(),
    }))
}

// ─── Hackatime Stats ─────────────────────────────────────────

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct HackatimeQuery {
    #[validate(required, regex(path = *HACKATIME_USER_RE))]
    user_id: Option<String>,
    #[validate(required, regex(path = *TOKEN_RE))]
    token: Option<String>,
}

/// Hackatime stats with the caller's attributed projects merged in.
async fn hackatime(
    State(state): State<Arc<AppState>>,
    ValidQuery(query): ValidQuery<HackatimeQuery>,
) -> Result<Json<serde_json::Value>> {
    let token = query.token.as_deref().unwrap_or_default();
    let user_id = query.user_id.as_deref().unwrap_or_default();

    let neighbor = state.db.neighbor_by_token(token).await?;

    let attributed = match neighbor.email.as_deref() {
        Some(email) => state
            .db
            .projects_for_email(email)
            .await
            .map_err(|e| e.during("Failed to fetch data"))?,
        None => vec![],
    };

    let stats = state
        .hackatime
        .user_stats(user_id)
        .await
        .map_err(|e| e.during("Failed to fetch data"))?;

    let (merged, count) = merge_projects(stats, &attributed);

    if count > 0 {
        let stamped = state
            .db
            .mark_hackatime_seen(&neighbor)
            .await
            .map_err(|e| e.during("Failed to fetch data"))?;
        if stamped {
            tracing::info!(neighbor_id = %neighbor.id, "First Hackatime projects recorded");
        }
    }

    Ok(Json(merged))
}
