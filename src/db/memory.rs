// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process [`RecordStore`] used for local runs and tests.

use crate::db::store::{Direction, Fields, Query, Record, RecordStore};
use crate::error::AppError;
use dashmap::DashMap;
use serde_json::Value;
use std::cmp::Ordering;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;

/// Tables keyed by name, records kept in insertion order.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<DashMap<String, Vec<Record>>>,
    next_id: Arc<AtomicU64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record with a caller-chosen id.
    pub fn insert(&self, table: &str, id: &str, fields: Value) {
        let fields = match fields {
            Value::Object(map) => map,
            _ => Fields::new(),
        };
        self.tables
            .entry(table.to_string())
            .or_default()
            .push(Record {
                id: id.to_string(),
                created_time: Some(chrono::Utc::now().to_rfc3339()),
                fields,
            });
    }

    /// Snapshot of a table's records.
    pub fn records(&self, table: &str) -> Vec<Record> {
        self.tables
            .get(table)
            .map(|records| records.value().clone())
            .unwrap_or_default()
    }

    fn generate_id(&self) -> String {
        let n = self.next_id.fetch_add(1, AtomicOrdering::Relaxed);
        format!("recMem{:010}", n)
    }
}

fn compare_field(a: &Record, b: &Record, field: &str) -> Ordering {
    match (a.fields.get(field), b.fields.get(field)) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        _ => Ordering::Equal,
    }
}

#[async_trait::async_trait]
impl RecordStore for MemoryStore {
    async fn select(&self, table: &str, query: &Query) -> Result<Vec<Record>, AppError> {
        let mut records: Vec<Record> = self
            .records(table)
            .into_iter()
            .filter(|r| {
                query
                    .filter
                    .as_ref()
                    .map_or(true, |formula| formula.matches(&r.fields))
            })
            .collect();

        if let Some(sort) = &query.sort {
            records.sort_by(|a, b| {
                let ord = compare_field(a, b, &sort.field);
                match sort.direction {
                    Direction::Asc => ord,
                    Direction::Desc => ord.reverse(),
                }
            });
        }

        if let Some(max) = query.max_records {
            records.truncate(max);
        }

        if !query.fields.is_empty() {
            for record in &mut records {
                record.fields.retain(|k, _| query.fields.contains(k));
            }
        }

        Ok(records)
    }

    async fn find(&self, table: &str, id: &str) -> Result<Option<Record>, AppError> {
        Ok(self
            .tables
            .get(table)
            .and_then(|records| records.iter().find(|r| r.id == id).cloned()))
    }

    async fn create(&self, table: &str, fields: Fields) -> Result<Record, AppError> {
        let record = Record {
            id: self.generate_id(),
            created_time: Some(chrono::Utc::now().to_rfc3339()),
            fields,
        };
        self.tables
            .entry(table.to_string())
            .or_default()
            .push(record.clone());
        Ok(record)
    }

    async fn update(&self, table: &str, id: &str, fields: Fields) -> Result<Record, AppError> {
        let mut records = self
            .tables
            .get_mut(table)
            .ok_or_else(|| AppError::NotFound(format!("Table {} not found", table)))?;
        let record = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Record {} not found", id)))?;

        record.fields.extend(fields);
        Ok(record.clone())
    }
}
