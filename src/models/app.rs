// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! App model and its API shapes.

use crate::db::store::Record;
use serde::{Deserialize, Serialize};
use serde_json::Value;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Longest description returned in listings, in characters.
const MAX_LISTING_DESCRIPTION: usize = 1000;

/// Field names in the Apps table.
pub mod fields {
    pub const NAME: &str = "Name";
    pub const ICON: &str = "Icon";
    pub const DESCRIPTION: &str = "Description";
    pub const NEIGHBORS: &str = "Neighbors";
    pub const CREATED_AT: &str = "createdAt";
    pub const IS_JOINABLE: &str = "is_joinable";
    pub const IS_HACKTENDO: &str = "isHacktendo";
    pub const APP_LINK: &str = "App Link";
    pub const GITHUB_LINK: &str = "Github Link";
    pub const IMAGES: &str = "Images";
}

/// An app (or game) record.
#[derive(Debug, Clone)]
pub struct App {
    pub id: String,
    pub name: Option<String>,
    pub icon: Option<String>,
    pub description: Option<String>,
    /// Neighbor record ids of members
    pub neighbors: Vec<String>,
    pub created_at: Option<String>,
    pub is_joinable: bool,
    pub is_hacktendo: Option<bool>,
    pub app_link: Option<String>,
    pub github_link: Option<String>,
    pub images: Vec<String>,
}

impl From<Record> for App {
    fn from(record: Record) -> Self {
        Self {
            name: record.str_field(fields::NAME).map(str::to_string),
            icon: record.fields.get(fields::ICON).and_then(attachment_url),
            description: record.str_field(fields::DESCRIPTION).map(str::to_string),
            neighbors: record.links(fields::NEIGHBORS),
            created_at: record.str_field(fields::CREATED_AT).map(str::to_string),
            is_joinable: record.bool_field(fields::IS_JOINABLE),
            is_hacktendo: record.fields.get(fields::IS_HACKTENDO).and_then(Value::as_bool),
            app_link: record.str_field(fields::APP_LINK).map(str::to_string),
            github_link: record.str_field(fields::GITHUB_LINK).map(str::to_string),
            images: record
                .fields
                .get(fields::IMAGES)
                .map(attachment_urls)
                .unwrap_or_default(),
            id: record.id,
        }
    }
}

impl App {
    pub fn has_member(&self, neighbor_id: &str) -> bool {
        self.neighbors.iter().any(|n| n == neighbor_id)
    }

    pub fn member_count(&self) -> usize {
        self.neighbors.len()
    }

    /// Listing entry; `fallback_name` is used when the record has no name.
    pub fn summary(&self, fallback_name: &str) -> AppSummary {
        AppSummary {
            id: self.id.clone(),
            name: self
                .name
                .clone()
                .unwrap_or_else(|| fallback_name.to_string()),
            icon: self.icon.clone(),
            description: self
                .description
                .as_deref()
                .map(|d| d.chars().take(MAX_LISTING_DESCRIPTION).collect())
                .unwrap_or_default(),
            member_count: self.member_count(),
            created_at: self.created_at.clone(),
        }
    }
}

/// Icon/image fields hold either a plain URL or an attachment array.
fn attachment_url(value: &Value) -> Option<String> {
    match value {
        Value::String(url) => Some(url.clone()),
        Value::Array(items) => items
            .first()
            .and_then(|a| a.get("url"))
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    }
}

fn attachment_urls(value: &Value) -> Vec<String> {
    match value {
        Value::String(url) => vec![url.clone()],
        Value::Array(items) => items
            .iter()
            .filter_map(|a| a.get("url").and_then(Value::as_str))
            .map(str::to_string)
            .collect(),
        _ => vec![],
    }
}

/// Entry in the available apps/games listings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "site/lib/generated/")
)]
pub struct AppSummary {
    pub id: String,
    pub name: String,
    pub icon: Option<String>,
    pub description: String,
    pub member_count: usize,
    pub created_at: Option<String>,
}

/// App the caller is a member of.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "site/lib/generated/")
)]
pub struct UserApp {
    pub id: String,
    pub name: String,
    pub icon: Option<String>,
    pub app_link: String,
    pub github_link: String,
    pub description: String,
    pub created_at: Option<String>,
    #[serde(rename = "Images")]
    pub images: Vec<String>,
    pub is_hacktendo: Option<bool>,
}

impl From<App> for UserApp {
    fn from(app: App) -> Self {
        Self {
            id: app.id,
            name: app.name.unwrap_or_else(|| "Unnamed App".to_string()),
            icon: app.icon,
            app_link: app.app_link.unwrap_or_default(),
            github_link: app.github_link.unwrap_or_default(),
            description: app.description.unwrap_or_default(),
            created_at: app.created_at,
            images: app.images,
            is_hacktendo: app.is_hacktendo,
        }
    }
}

/// Apps the neighbor can still join, most popular first.
///
/// With `require_joinable`, records not flagged `is_joinable` are dropped too.
pub fn available_for(apps: Vec<App>, neighbor_id: &str, require_joinable: bool) -> Vec<App> {
    let mut available: Vec<App> = apps
        .into_iter()
        .filter(|app| !require_joinable || app.is_joinable)
        .filter(|app| !app.has_member(neighbor_id))
        .collect();
    // Stable sort keeps store order among equal counts
    available.sort_by(|a, b| b.member_count().cmp(&a.member_count()));
    available
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn app(id: &str, v: Value) -> App {
        App::from(Record {
            id: id.to_string(),
            created_time: None,
            fields: v.as_object().cloned().unwrap(),
        })
    }

    #[test]
    fn test_icon_normalization() {
        let plain = app("a", json!({"Icon": "https://x/icon.png"}));
        let attached = app(
            "b",
            json!({"Icon": [{"url": "https://x/1.png"}, {"url": "https://x/2.png"}]}),
        );
        let empty = app("c", json!({"Icon": []}));

        assert_eq!(plain.icon.as_deref(), Some("https://x/icon.png"));
        assert_eq!(attached.icon.as_deref(), Some("https://x/1.png"));
        assert_eq!(empty.icon, None);
    }

    #[test]
    fn test_summary_defaults_and_truncation() {
        let long = "é".repeat(1200);
        let a = app("a", json!({"Description": long, "Neighbors": ["r1", "r2"]}));
        let summary = a.summary("Unnamed Game");

        assert_eq!(summary.name, "Unnamed Game");
        assert_eq!(summary.description.chars().count(), 1000);
        assert_eq!(summary.member_count, 2);
    }

    #[test]
    fn test_available_excludes_members_and_sorts() {
        let apps = vec![
            app("small", json!({"is_joinable": true, "Neighbors": ["x"]})),
            app("mine", json!({"is_joinable": true, "Neighbors": ["me", "x", "y"]})),
            app("closed", json!({"is_joinable": false, "Neighbors": ["a", "b", "c", "d"]})),
            app("big", json!({"is_joinable": true, "Neighbors": ["a", "b"]})),
        ];

        let ids: Vec<String> = available_for(apps.clone(), "me", true)
            .into_iter()
            .map(|a| a.id)
            .collect();
        assert_eq!(ids, vec!["big", "small"]);

        let ids: Vec<String> = available_for(apps, "me", false)
            .into_iter()
            .map(|a| a.id)
            .collect();
        assert_eq!(ids, vec!["closed", "big", "small"]);
    }

    #[test]
    fn test_user_app_shape() {
        let a = app(
            "a",
            json!({"Name": "Game", "Images": [{"url": "u1"}, {"url": "u2"}], "isHacktendo": true}),
        );
        let value = serde_json::to_value(UserApp::from(a)).unwrap();

        assert_eq!(value["Images"], json!(["u1", "u2"]));
        assert_eq!(value["isHacktendo"], json!(true));
        assert_eq!(value["appLink"], json!(""));
    }
}
