// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Devlog posts.

use crate::db::tables;
use crate::error::{AppError, Result};
use crate::models::post::fields;
use crate::models::{DevlogSubmission, LatestPost};
use crate::routes::extract::{method_not_allowed, ValidJson};
use crate::AppState;
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/getLatestPost",
            get(get_latest_post).fallback(method_not_allowed),
        )
        .route(
            "/api/postDevlog",
            post(post_devlog).fallback(method_not_allowed),
        )
}

#[derive(Serialize)]
pub struct LatestPostResponse {
    pub post: Option<LatestPost>,
}

/// Most recent post with its app and author names resolved.
async fn get_latest_post(State(state): State<Arc<AppState>>) -> Result<Json<LatestPostResponse>> {
    let Some(record) = state
        .db
        .latest_post()
        .await
        .map_err(|e| e.during("Error fetching latest post"))?
    else {
        return Ok(Json(LatestPostResponse { post: None }));
    };

    let app_id = record.links(fields::APP).into_iter().next();
    let neighbor_id = record.links(fields::NEIGHBOR).into_iter().next();

    let (app, neighbor) = tokio::join!(
        async {
            match &app_id {
                Some(id) => Some(state.db.display_name(tables::APPS, id).await),
                None => None,
            }
        },
        async {
            match &neighbor_id {
                Some(id) => Some(state.db.display_name(state.db.users_table(), id).await),
                None => None,
            }
        },
    );

    Ok(Json(LatestPostResponse {
        post: Some(LatestPost::new(record, app, neighbor)),
    }))
}

#[derive(Serialize)]
pub struct DevlogResponse {
    pub message: String,
    pub post: Value,
}

/// Create a devlog post for an app the caller belongs to.
async fn post_devlog(
    State(state): State<Arc<AppState>>,
    ValidJson(submission): ValidJson<DevlogSubmission>,
) -> Result<Json<DevlogResponse>> {
    let neighbor = state.db.neighbor_by_token(&submission.neighbor).await?;

    let app = state
        .db
        .find_app(submission.app.trim())
        .await
        .map_err(|e| e.during("Failed to post devlog"))?
        .ok_or_else(|| AppError::NotFound("App not found".to_string()))?;

    if !app.has_member(&neighbor.id) {
        tracing::warn!(
            app_id = %app.id,
            neighbor_id = %neighbor.id,
            "Rejected devlog from non-member"
        );
        return Err(AppError::Forbidden(
            "You are not a member of this app".to_string(),
        ));
    }

    let record = state
        .db
        .create_post(submission.to_fields(&neighbor.id, &app.id))
        .await
        .map_err(|e| e.during("Failed to post devlog"))?;

    tracing::info!(post_id = %record.id, app_id = %app.id, "Devlog posted");

    let post = serde_json::to_value(&record).map_err(anyhow::Error::from)?;
    Ok(Json(DevlogResponse {
        message: "Devlog posted successfully".to_string(),
        post,
    }))
}
