// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Record store abstraction.

use crate::db::formula::Formula;
use crate::error::AppError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field map of a record.
pub type Fields = Map<String, Value>;

/// A row in a remote table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    #[serde(rename = "createdTime", default)]
    pub created_time: Option<String>,
    #[serde(default)]
    pub fields: Fields,
}

impl Record {
    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }

    pub fn bool_field(&self, name: &str) -> bool {
        match self.fields.get(name) {
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_f64() == Some(1.0),
            _ => false,
        }
    }

    /// Linked record ids. A single string counts as a one-element link.
    pub fn links(&self, name: &str) -> Vec<String> {
        match self.fields.get(name) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
            Some(Value::String(s)) => vec![s.clone()],
            _ => vec![],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    pub field: String,
    pub direction: Direction,
}

/// Parameters for listing records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub filter: Option<Formula>,
    /// Fields to return; empty means all.
    pub fields: Vec<String>,
    pub max_records: Option<usize>,
    pub sort: Option<Sort>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, formula: Formula) -> Self {
        self.filter = Some(formula);
        self
    }

    pub fn fields(mut self, fields: &[&str]) -> Self {
        self.fields = fields.iter().map(|f| f.to_string()).collect();
        self
    }

    pub fn max_records(mut self, n: usize) -> Self {
        self.max_records = Some(n);
        self
    }

    pub fn sort(mut self, field: &str, direction: Direction) -> Self {
        self.sort = Some(Sort {
            field: field.to_string(),
            direction,
        });
        self
    }
}

/// Minimal CRUD surface of the tabular store.
///
/// Implementations hold no cached data: every call goes to the backing store.
#[async_trait::async_trait]
pub trait RecordStore: Send + Sync {
    /// List records matching `query`, following pagination to the end.
    async fn select(&self, table: &str, query: &Query) -> Result<Vec<Record>, AppError>;

    /// Fetch one record by id; `Ok(None)` if it does not exist.
    async fn find(&self, table: &str, id: &str) -> Result<Option<Record>, AppError>;

    async fn create(&self, table: &str, fields: Fields) -> Result<Record, AppError>;

    /// Merge `fields` into an existing record.
    async fn update(&self, table: &str, id: &str, fields: Fields) -> Result<Record, AppError>;

    /// First record matching `query`.
    async fn select_first(&self, table: &str, query: Query) -> Result<Option<Record>, AppError> {
        let query = query.max_records(1);
        Ok(self.select(table, &query).await?.into_iter().next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_accessors() {
        let record: Record = serde_json::from_value(json!({
            "id": "recApp1",
            "createdTime": "2025-05-01T00:00:00.000Z",
            "fields": {
                "Name": "Spaceship",
                "Neighbors": ["recA", "recB"],
                "app": "recSolo",
                "is_joinable": true
            }
        }))
        .unwrap();

        assert_eq!(record.str_field("Name"), Some("Spaceship"));
        assert_eq!(record.links("Neighbors"), vec!["recA", "recB"]);
        assert_eq!(record.links("app"), vec!["recSolo"]);
        assert!(record.links("missing").is_empty());
        assert!(record.bool_field("is_joinable"));
        assert!(!record.bool_field("isHacktendo"));
    }
}
