// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Typed operations over the record store.
//!
//! Provides high-level operations for:
//! - Neighbors (lookup by token or email, profile flags)
//! - Apps (membership listings)
//! - Hackatime projects (create, link, update GitHub link)
//! - Posts (latest post, devlog creation)
//! - OTP codes

use crate::db::formula::Formula;
use crate::db::store::{Direction, Fields, Query, Record, RecordStore};
use crate::db::tables;
use crate::error::AppError;
use crate::models::{app, neighbor, post, project, App, Neighbor, Project};
use crate::validation::is_valid_token;
use serde_json::Value;
use std::sync::Arc;

/// Record store client shared by all handlers.
///
/// Built once at startup and handed to handlers through application state.
/// Holds no data between calls.
#[derive(Clone)]
pub struct Database {
    store: Arc<dyn RecordStore>,
    users_table: String,
}

impl Database {
    pub fn new(store: Arc<dyn RecordStore>, users_table: impl Into<String>) -> Self {
        Self {
            store,
            users_table: users_table.into(),
        }
    }

    pub fn users_table(&self) -> &str {
        &self.users_table
    }

    // ─── Neighbor Operations ─────────────────────────────────────

    /// Resolve the caller from their token.
    ///
    /// An unknown token is `NotFound`, never a server error.
    pub async fn neighbor_by_token(&self, token: &str) -> Result<Neighbor, AppError> {
        if !is_valid_token(token) {
            return Err(AppError::BadRequest("Invalid token format".to_string()));
        }

        self.store
            .select_first(
                &self.users_table,
                Query::new().filter(Formula::eq(neighbor::fields::TOKEN, token)),
            )
            .await?
            .map(Neighbor::from)
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    /// Case-insensitive lookup by email.
    pub async fn neighbor_by_email(&self, email: &str) -> Result<Option<Neighbor>, AppError> {
        Ok(self
            .store
            .select_first(
                &self.users_table,
                Query::new().filter(Formula::eq_ignore_case(neighbor::fields::EMAIL, email)),
            )
            .await?
            .map(Neighbor::from))
    }

    /// Stamp the first time Hackatime projects were seen. No-op if already set.
    pub async fn mark_hackatime_seen(&self, neighbor: &Neighbor) -> Result<bool, AppError> {
        if neighbor.has_hackatime_at.is_some() {
            return Ok(false);
        }
        let mut fields = Fields::new();
        fields.insert(
            neighbor::fields::HAS_HACKATIME_AT.into(),
            chrono::Utc::now().to_rfc3339().into(),
        );
        self.store
            .update(&self.users_table, &neighbor.id, fields)
            .await?;
        Ok(true)
    }

    pub async fn mark_hacktendo_signup(&self, neighbor_id: &str) -> Result<(), AppError> {
        let mut fields = Fields::new();
        fields.insert(neighbor::fields::HACKTENDO_SIGNUP.into(), Value::Bool(true));
        self.store
            .update(&self.users_table, neighbor_id, fields)
            .await?;
        Ok(())
    }

    /// Display name of a neighbor or app record, escaped for rendering.
    ///
    /// Lookup failures fall back to the id rather than failing the request.
    pub async fn display_name(&self, table: &str, id: &str) -> String {
        let name = match self.store.find(table, id).await {
            Ok(Some(record)) => neighbor::display_name(&record),
            Ok(None) => id.to_string(),
            Err(e) => {
                tracing::warn!(table, id, error = %e, "Failed to resolve record name");
                id.to_string()
            }
        };
        crate::sanitize::escape_html(&name).into_owned()
    }

    // ─── App Operations ──────────────────────────────────────────

    /// All apps, optionally only those flagged as games.
    pub async fn list_apps(&self, games_only: bool, fields: &[&str]) -> Result<Vec<App>, AppError> {
        let mut query = Query::new().fields(fields);
        if games_only {
            query = query.filter(Formula::is_true(app::fields::IS_HACKTENDO));
        }
        let records = self.store.select(tables::APPS, &query).await?;
        Ok(records.into_iter().map(App::from).collect())
    }

    /// Find an app by record id, falling back to an exact name match.
    pub async fn find_app(&self, id_or_name: &str) -> Result<Option<App>, AppError> {
        if id_or_name.starts_with("rec") {
            if let Some(record) = self.store.find(tables::APPS, id_or_name).await? {
                return Ok(Some(App::from(record)));
            }
        }
        Ok(self
            .store
            .select_first(
                tables::APPS,
                Query::new().filter(Formula::eq(app::fields::NAME, id_or_name)),
            )
            .await?
            .map(App::from))
    }

    // ─── Project Operations ──────────────────────────────────────

    pub async fn project_by_name(&self, name: &str) -> Result<Option<Project>, AppError> {
        Ok(self
            .store
            .select_first(
                tables::PROJECTS,
                Query::new().filter(Formula::eq(project::fields::NAME, name)),
            )
            .await?
            .map(Project::from))
    }

    /// Projects attributed to an email address.
    pub async fn projects_for_email(&self, email: &str) -> Result<Vec<Project>, AppError> {
        let records = self
            .store
            .select(
                tables::PROJECTS,
                &Query::new()
                    .filter(Formula::eq(project::fields::EMAIL, email))
                    .fields(&[
                        project::fields::NAME,
                        project::fields::GITHUB_LINK,
                        project::fields::NEIGHBOR,
                    ]),
            )
            .await?;
        Ok(records.into_iter().map(Project::from).collect())
    }

    pub async fn create_project(
        &self,
        name: &str,
        github_link: &str,
        neighbor_id: &str,
    ) -> Result<Project, AppError> {
        let mut fields = Fields::new();
        fields.insert(project::fields::NAME.into(), name.into());
        fields.insert(project::fields::GITHUB_LINK.into(), github_link.into());
        fields.insert(project::fields::NEIGHBOR.into(), Value::from(vec![neighbor_id]));

        let record = self.store.create(tables::PROJECTS, fields).await?;
        Ok(Project::from(record))
    }

    /// Link a neighbor to a project unless already linked.
    ///
    /// Returns the project as stored afterwards and whether a link was added.
    pub async fn add_project_member(
        &self,
        project: Project,
        neighbor_id: &str,
    ) -> Result<(Project, bool), AppError> {
        if project.has_member(neighbor_id) {
            return Ok((project, false));
        }

        let mut neighbors = project.neighbors.clone();
        neighbors.push(neighbor_id.to_string());
        let mut fields = Fields::new();
        fields.insert(project::fields::NEIGHBOR.into(), Value::from(neighbors));

        let record = self
            .store
            .update(tables::PROJECTS, &project.id, fields)
            .await?;
        Ok((Project::from(record), true))
    }

    pub async fn update_project_github(
        &self,
        project_id: &str,
        github_link: &str,
    ) -> Result<Project, AppError> {
        let mut fields = Fields::new();
        fields.insert(project::fields::GITHUB_LINK.into(), github_link.into());
        let record = self
            .store
            .update(tables::PROJECTS, project_id, fields)
            .await?;
        Ok(Project::from(record))
    }

    // ─── Post Operations ─────────────────────────────────────────

    pub async fn latest_post(&self) -> Result<Option<Record>, AppError> {
        self.store
            .select_first(
                tables::POSTS,
                Query::new().sort(post::fields::CREATED_AT, Direction::Desc),
            )
            .await
    }

    pub async fn create_post(&self, fields: Fields) -> Result<Record, AppError> {
        self.store.create(tables::POSTS, fields).await
    }

    // ─── OTP Operations ──────────────────────────────────────────

    /// Store an unused OTP for an email (already normalized).
    pub async fn create_otp(&self, email: &str, code: &str) -> Result<Record, AppError> {
        let mut fields = Fields::new();
        fields.insert("Email".into(), email.into());
        fields.insert("OTP".into(), code.into());
        fields.insert("isUsed".into(), Value::Bool(false));
        self.store.create(tables::OTP, fields).await
    }
}
