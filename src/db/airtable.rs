// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Airtable REST client implementing [`RecordStore`].
//!
//! Handles:
//! - Filtered listing with pagination (`offset`)
//! - Lookup by record id
//! - Record creation and partial updates
//! - Mapping Airtable error bodies into [`AppError::Database`]

use crate::db::store::{Fields, Query, Record, RecordStore};
use crate::error::AppError;
use reqwest::{StatusCode, Url};
use serde::{Deserialize, Serialize};

/// Airtable REST client bound to one base.
#[derive(Clone)]
pub struct AirtableStore {
    http: reqwest::Client,
    api_url: String,
    base_id: String,
    api_key: String,
}

#[derive(Deserialize)]
struct ListResponse {
    records: Vec<Record>,
    offset: Option<String>,
}

#[derive(Serialize)]
struct CreateRequest<'a> {
    records: [NewRecord<'a>; 1],
}

#[derive(Serialize)]
struct NewRecord<'a> {
    fields: &'a Fields,
}

#[derive(Serialize)]
struct UpdateRequest<'a> {
    fields: &'a Fields,
}

#[derive(Deserialize)]
struct CreateResponse {
    records: Vec<Record>,
}

impl AirtableStore {
    pub fn new(api_url: &str, base_id: &str, api_key: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
            base_id: base_id.to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// `{api}/{base}/{table}[/{id}]` with each segment percent-encoded.
    fn table_url(&self, table: &str, id: Option<&str>) -> Result<Url, AppError> {
        let mut url = Url::parse(&self.api_url)
            .map_err(|e| AppError::database(format!("Invalid Airtable URL: {}", e)))?;
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| AppError::database("Airtable URL cannot be a base"))?;
            segments.push(&self.base_id).push(table);
            if let Some(id) = id {
                segments.push(id);
            }
        }
        Ok(url)
    }

    fn list_params(query: &Query, offset: Option<&str>) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(filter) = &query.filter {
            params.push(("filterByFormula".to_string(), filter.to_airtable()));
        }
        for field in &query.fields {
            params.push(("fields[]".to_string(), field.clone()));
        }
        if let Some(max) = query.max_records {
            params.push(("maxRecords".to_string(), max.to_string()));
        }
        if let Some(sort) = &query.sort {
            params.push(("sort[0][field]".to_string(), sort.field.clone()));
            params.push((
                "sort[0][direction]".to_string(),
                sort.direction.as_str().to_string(),
            ));
        }
        if let Some(offset) = offset {
            params.push(("offset".to_string(), offset.to_string()));
        }
        params
    }

    /// Check response status, turning Airtable error bodies into [`AppError`].
    async fn check_response_json<T: for<'de> Deserialize<'de>>(
        response: reqwest::Response,
    ) -> Result<T, AppError> {
        let status = response.status();
        if status.is_success() {
            return response
                .json()
                .await
                .map_err(|e| AppError::database(format!("Invalid Airtable response: {}", e)));
        }

        let body = response.text().await.unwrap_or_default();
        let details = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("error").cloned());

        if status == StatusCode::TOO_MANY_REQUESTS {
            tracing::warn!("Airtable rate limit hit (429)");
        }

        Err(AppError::Database {
            message: format!("Airtable HTTP {}", status),
            details,
        })
    }
}

#[async_trait::async_trait]
impl RecordStore for AirtableStore {
    async fn select(&self, table: &str, query: &Query) -> Result<Vec<Record>, AppError> {
        let url = self.table_url(table, None)?;
        let mut records = Vec::new();
        let mut offset: Option<String> = None;

        loop {
            let response = self
                .http
                .get(url.clone())
                .bearer_auth(&self.api_key)
                .query(&Self::list_params(query, offset.as_deref()))
                .send()
                .await
                .map_err(|e| AppError::database(e.to_string()))?;

            let page: ListResponse = Self::check_response_json(response).await?;
            records.extend(page.records);

            let limit_reached = query.max_records.is_some_and(|max| records.len() >= max);
            match page.offset {
                Some(next) if !limit_reached => offset = Some(next),
                _ => break,
            }
        }

        if let Some(max) = query.max_records {
            records.truncate(max);
        }
        tracing::debug!(table, count = records.len(), "Airtable select");
        Ok(records)
    }

    async fn find(&self, table: &str, id: &str) -> Result<Option<Record>, AppError> {
        let url = self.table_url(table, Some(id))?;
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Self::check_response_json(response).await.map(Some)
    }

    async fn create(&self, table: &str, fields: Fields) -> Result<Record, AppError> {
        let url = self.table_url(table, None)?;
        let body = CreateRequest {
            records: [NewRecord { fields: &fields }],
        };

        let response = self
            .http
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        let created: CreateResponse = Self::check_response_json(response).await?;
        created
            .records
            .into_iter()
            .next()
            .ok_or_else(|| AppError::database("Airtable create returned no records"))
    }

    async fn update(&self, table: &str, id: &str, fields: Fields) -> Result<Record, AppError> {
        let url = self.table_url(table, Some(id))?;
        let response = self
            .http
            .patch(url)
            .bearer_auth(&self.api_key)
            .json(&UpdateRequest { fields: &fields })
            .send()
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        Self::check_response_json(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::formula::Formula;
    use crate::db::store::Direction;
    use mockito::Matcher;
    use serde_json::json;

    #[tokio::test]
    async fn test_select_follows_offset() {
        let mut server = mockito::Server::new_async().await;
        let first = server
            .mock("GET", "/v0/appBase/Apps")
            .match_query(Matcher::Regex("^filterByFormula=[^&]+$".into()))
            .match_header("authorization", "Bearer key")
            .with_body(
                json!({"records": [{"id": "rec1", "fields": {"Name": "A"}}], "offset": "itr2"})
                    .to_string(),
            )
            .create_async()
            .await;
        let second = server
            .mock("GET", "/v0/appBase/Apps")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("filterByFormula".into(), "{isHacktendo} = 1".into()),
                Matcher::UrlEncoded("offset".into(), "itr2".into()),
            ]))
            .with_body(json!({"records": [{"id": "rec2", "fields": {"Name": "B"}}]}).to_string())
            .create_async()
            .await;

        let store = AirtableStore::new(&format!("{}/v0", server.url()), "appBase", "key");
        let records = store
            .select("Apps", &Query::new().filter(Formula::is_true("isHacktendo")))
            .await
            .unwrap();

        first.assert_async().await;
        second.assert_async().await;
        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["rec1", "rec2"]);
    }

    #[test]
    fn test_list_params() {
        let query = Query::new()
            .fields(&["Name", "Neighbors"])
            .max_records(1)
            .sort("createdAt", Direction::Desc);
        let params = AirtableStore::list_params(&query, None);

        assert!(params.contains(&("fields[]".to_string(), "Neighbors".to_string())));
        assert!(params.contains(&("maxRecords".to_string(), "1".to_string())));
        assert!(params.contains(&("sort[0][direction]".to_string(), "desc".to_string())));
        assert!(!params.iter().any(|(k, _)| k == "filterByFormula"));
    }

    #[tokio::test]
    async fn test_error_body_is_kept() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v0/appBase/Posts")
            .with_status(422)
            .with_body(
                json!({"error": {"type": "INVALID_VALUE_FOR_COLUMN", "message": "bad"}})
                    .to_string(),
            )
            .create_async()
            .await;

        let store = AirtableStore::new(&format!("{}/v0", server.url()), "appBase", "key");
        let err = store.create("Posts", Fields::new()).await.unwrap_err();

        match err {
            AppError::Database { details, .. } => {
                assert_eq!(details.unwrap()["type"], "INVALID_VALUE_FOR_COLUMN");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_find_missing_record() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/v0/appBase/Apps/recNope")
            .with_status(404)
            .with_body(r#"{"error":"NOT_FOUND"}"#)
            .create_async()
            .await;

        let store = AirtableStore::new(&format!("{}/v0", server.url()), "appBase", "key");
        assert!(store.find("Apps", "recNope").await.unwrap().is_none());
    }
}
