// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Hackatime project model.

use crate::db::store::Record;
use serde::Serialize;

/// Field names in the hackatimeProjects table.
pub mod fields {
    pub const NAME: &str = "name";
    pub const GITHUB_LINK: &str = "githubLink";
    pub const NEIGHBOR: &str = "neighbor";
    /// Lookup of the linked neighbors' emails
    pub const EMAIL: &str = "email";
}

/// A time-tracked project linked to one or more neighbors.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    pub github_link: String,
    #[serde(rename = "neighbor")]
    pub neighbors: Vec<String>,
}

impl From<Record> for Project {
    fn from(record: Record) -> Self {
        Self {
            name: record.str_field(fields::NAME).unwrap_or_default().to_string(),
            github_link: record
                .str_field(fields::GITHUB_LINK)
                .unwrap_or_default()
                .to_string(),
            neighbors: record.links(fields::NEIGHBOR),
            id: record.id,
        }
    }
}

impl Project {
    pub fn has_member(&self, neighbor_id: &str) -> bool {
        self.neighbors.iter().any(|n| n == neighbor_id)
    }
}
