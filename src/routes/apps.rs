// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! App and game listings for the desktop app selector.

use crate::error::Result;
use crate::models::app::{available_for, fields};
use crate::models::{AppSummary, UserApp};
use crate::routes::extract::{method_not_allowed, ValidQuery};
use crate::validation::TOKEN_RE;
use crate::AppState;
use axum::{extract::State, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/getAvailableApps",
            get(get_available_apps).fallback(method_not_allowed),
        )
        .route(
            "/api/getAvailableGames",
            get(get_available_games).fallback(method_not_allowed),
        )
        .route(
            "/api/getUserApps",
            get(get_user_apps).fallback(method_not_allowed),
        )
}

#[derive(Deserialize, Validate)]
pub(crate) struct TokenQuery {
    #[validate(required, regex(path = *TOKEN_RE))]
    pub token: Option<String>,
}

impl TokenQuery {
    pub fn token(&self) -> &str {
        self.token.as_deref().unwrap_or_default()
    }
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "site/lib/generated/")
)]
pub struct AppsResponse<T> {
    pub apps: Vec<T>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "site/lib/generated/")
)]
pub struct GamesResponse {
    pub games: Vec<AppSummary>,
}

const LISTING_FIELDS: [&str; 6] = [
    fields::NAME,
    fields::ICON,
    fields::DESCRIPTION,
    fields::NEIGHBORS,
    fields::CREATED_AT,
    fields::IS_JOINABLE,
];

/// Joinable apps the caller is not a member of, most popular first.
async fn get_available_apps(
    State(state): State<Arc<AppState>>,
    ValidQuery(query): ValidQuery<TokenQuery>,
) -> Result<Json<AppsResponse<AppSummary>>> {
    let neighbor = state.db.neighbor_by_token(query.token()).await?;

    let apps = state
        .db
        .list_apps(false, &LISTING_FIELDS)
        .await
        .map_err(|e| e.during("Error fetching available apps"))?;

    let available: Vec<AppSummary> = available_for(apps, &neighbor.id, true)
        .iter()
        .map(|a| a.summary("Unnamed App"))
        .collect();

    tracing::debug!(
        neighbor_id = %neighbor.id,
        count = available.len(),
        "Listed available apps"
    );
    Ok(Json(AppsResponse { apps: available }))
}

/// Games (Hacktendo apps) the caller is not a member of, most popular first.
async fn get_available_games(
    State(state): State<Arc<AppState>>,
    ValidQuery(query): ValidQuery<TokenQuery>,
) -> Result<Json<GamesResponse>> {
    let neighbor = state.db.neighbor_by_token(query.token()).await?;

    let mut game_fields = LISTING_FIELDS.to_vec();
    game_fields.retain(|f| *f != fields::IS_JOINABLE);
    game_fields.push(fields::IS_HACKTENDO);

    let games = state
        .db
        .list_apps(true, &game_fields)
        .await
        .map_err(|e| e.during("Error fetching available games"))?;

    let available = available_for(games, &neighbor.id, false)
        .iter()
        .map(|g| g.summary("Unnamed Game"))
        .collect();

    Ok(Json(GamesResponse { games: available }))
}

/// Apps the caller is a member of.
async fn get_user_apps(
    State(state): State<Arc<AppState>>,
    ValidQuery(query): ValidQuery<TokenQuery>,
) -> Result<Json<AppsResponse<UserApp>>> {
    let neighbor = state.db.neighbor_by_token(query.token()).await?;

    let apps = state
        .db
        .list_apps(
            false,
            &[
                fields::NAME,
                fields::ICON,
                fields::CREATED_AT,
                fields::NEIGHBORS,
                fields::APP_LINK,
                fields::GITHUB_LINK,
                fields::DESCRIPTION,
                fields::IMAGES,
                fields::IS_HACKTENDO,
            ],
        )
        .await
        .map_err(|e| e.during("Error fetching apps"))?;

    let total = apps.len();
    let mine: Vec<UserApp> = apps
        .into_iter()
        .filter(|a| a.has_member(&neighbor.id))
        .map(UserApp::from)
        .collect();

    if mine.is_empty() {
        tracing::info!(neighbor_id = %neighbor.id, total, "Neighbor has no apps");
    }

    Ok(Json(AppsResponse { apps: mine }))
}
