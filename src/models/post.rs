// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Devlog posts: the submission DTO and the latest-post view.

use crate::db::store::{Fields, Record};
use crate::sanitize::{escape_html, sanitize_value};
use crate::validation::{not_blank, HTTP_URL_RE, TOKEN_RE};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

/// Field names in the Posts table.
pub mod fields {
    pub const DEMO_VIDEO: &str = "demoVideo";
    pub const PHOTOBOOTH_VIDEO: &str = "photoboothVideo";
    pub const DESCRIPTION: &str = "description";
    pub const NEIGHBOR: &str = "neighbor";
    pub const APP: &str = "app";
    pub const CREATED_AT: &str = "createdAt";
}

/// A devlog as sent by the composer. Built once at submit time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DevlogSubmission {
    #[validate(regex(path = *HTTP_URL_RE))]
    pub demo_video: String,
    #[validate(regex(path = *HTTP_URL_RE))]
    pub photobooth_video: String,
    #[validate(custom(function = not_blank), length(max = 5000))]
    pub description: String,
    /// Submitter token
    #[validate(regex(path = *TOKEN_RE))]
    pub neighbor: String,
    /// App name as shown in the composer, or the app record id
    #[validate(custom(function = not_blank), length(max = 200))]
    pub app: String,
}

impl DevlogSubmission {
    /// Posts-table fields linking the devlog to its app and author.
    pub fn to_fields(&self, neighbor_id: &str, app_id: &str) -> Fields {
        let mut out = Fields::new();
        out.insert(fields::DEMO_VIDEO.into(), self.demo_video.clone().into());
        out.insert(
            fields::PHOTOBOOTH_VIDEO.into(),
            self.photobooth_video.clone().into(),
        );
        out.insert(
            fields::DESCRIPTION.into(),
            self.description.trim().to_string().into(),
        );
        out.insert(fields::NEIGHBOR.into(), Value::from(vec![neighbor_id]));
        out.insert(fields::APP.into(), Value::from(vec![app_id]));
        out
    }
}

/// Most recent post with display names resolved, safe for direct rendering.
#[derive(Debug, Clone, Serialize)]
pub struct LatestPost {
    #[serde(rename = "airtableId")]
    pub airtable_id: String,
    #[serde(flatten)]
    pub fields: Fields,
    pub app: Option<String>,
    pub neighbor: Option<String>,
    /// Always empty for the latest-post view
    pub comments: Vec<Value>,
}

impl LatestPost {
    /// Sanitize a post record; `app` and `neighbor` are names already escaped.
    pub fn new(record: Record, app: Option<String>, neighbor: Option<String>) -> Self {
        let mut raw = record.fields;
        for key in [fields::APP, fields::NEIGHBOR, "comments", "airtableId"] {
            raw.remove(key);
        }
        let sanitized = match sanitize_value(Value::Object(raw)) {
            Value::Object(map) => map,
            _ => Fields::new(),
        };

        Self {
            airtable_id: escape_html(&record.id).into_owned(),
            fields: sanitized,
            app,
            neighbor,
            comments: vec![],
        }
    }
}
