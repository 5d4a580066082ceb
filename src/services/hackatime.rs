// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Hackatime stats client.
//!
//! Fetches a user's per-project coding stats and merges in the projects the
//! neighbor has attributed in the record store, so the UI can show which
//! projects are checked and their GitHub links.

use crate::error::AppError;
use crate::models::Project;
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};

/// Hackatime API client.
#[derive(Clone)]
pub struct HackatimeClient {
    http: reqwest::Client,
    base_url: String,
    start_date: String,
}

impl HackatimeClient {
    pub fn new(base_url: &str, start_date: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            start_date: start_date.to_string(),
        }
    }

    /// Raw stats document for a user, with per-project breakdown.
    ///
    /// `user_id` must already be validated; it is placed in the URL path.
    pub async fn user_stats(&self, user_id: &str) -> Result<Value, AppError> {
        let url = format!("{}/users/{}/stats", self.base_url, user_id);

        let response = self
            .http
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .query(&[
                ("features", "projects"),
                ("start_date", self.start_date.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Hackatime request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::Upstream(format!(
                "Hackatime API responded with status: {}",
                response.status().as_u16()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("Invalid Hackatime response: {}", e)))
    }
}

/// Merge attributed projects into a stats document.
///
/// Every Hackatime project gains `isChecked` and `githubLink`. Attributed
/// projects Hackatime does not know about are appended with zero time and
/// `source: "airtable"`. Returns the merged document and the project count.
pub fn merge_projects(mut stats: Value, attributed: &[Project]) -> (Value, usize) {
    let links: HashMap<&str, &str> = attributed
        .iter()
        .map(|p| (p.name.as_str(), p.github_link.as_str()))
        .collect();

    let tracked: Vec<Value> = stats
        .pointer("/data/projects")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    let mut seen = HashSet::new();
    let mut projects: Vec<Value> = tracked
        .into_iter()
        .map(|mut project| {
            let name = project
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            if let Value::Object(map) = &mut project {
                map.insert("isChecked".into(), links.contains_key(name.as_str()).into());
                map.insert(
                    "githubLink".into(),
                    links.get(name.as_str()).copied().unwrap_or_default().into(),
                );
            }
            seen.insert(name);
            project
        })
        .collect();

    projects.extend(
        attributed
            .iter()
            .filter(|p| !seen.contains(&p.name))
            .map(|p| {
                json!({
                    "name": p.name,
                    "isChecked": true,
                    "githubLink": p.github_link,
                    "totalSeconds": 0,
                    "languages": {},
                    "source": "airtable",
                })
            }),
    );

    let count = projects.len();
    if !stats.is_object() {
        stats = json!({});
    }
    if !stats.get("data").is_some_and(Value::is_object) {
        stats["data"] = json!({});
    }
    stats["data"]["projects"] = Value::Array(projects);
    (stats, count)
}
