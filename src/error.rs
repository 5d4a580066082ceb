// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.
//!
//! Every handler error ends up as one of five statuses: 400, 403, 404, 405 or
//! 500. Server-side failures carry a best-effort diagnostic payload so the
//! composer can show it inline.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Upstream service error: {0}")]
    Upstream(String),

    #[error("Record store error: {message}")]
    Database {
        message: String,
        /// Error object returned by the record store, when it sent one.
        details: Option<serde_json::Value>,
    },

    #[error("{message}: {source}")]
    Failed {
        message: String,
        #[source]
        source: Box<AppError>,
    },

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Record store failure without a structured error body.
    pub fn database(message: impl Into<String>) -> Self {
        AppError::Database {
            message: message.into(),
            details: None,
        }
    }

    /// Attach a user-facing message to server-side failures.
    ///
    /// Client errors (4xx) pass through untouched so their status and message
    /// survive.
    pub fn during(self, message: impl Into<String>) -> Self {
        if self.status().is_server_error() {
            AppError::Failed {
                message: message.into(),
                source: Box::new(self),
            }
        } else {
            self
        }
    }

    /// HTTP status this error maps to.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Upstream(_)
            | AppError::Database { .. }
            | AppError::Failed { .. }
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn store_details(&self) -> Option<&serde_json::Value> {
        match self {
            AppError::Database { details, .. } => details.as_ref(),
            AppError::Failed { source, .. } => source.store_details(),
            _ => None,
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors
            .field_errors()
            .into_keys()
            .map(|field| field.to_string())
            .collect();
        fields.sort_unstable();
        AppError::BadRequest(format!("Invalid input format: {}", fields.join(", ")))
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(rename = "airtableError", skip_serializing_if = "Option::is_none")]
    airtable_error: Option<serde_json::Value>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match &self {
            AppError::BadRequest(msg) | AppError::NotFound(msg) | AppError::Forbidden(msg) => {
                ErrorResponse {
                    message: msg.clone(),
                    error: None,
                    airtable_error: None,
                }
            }
            AppError::MethodNotAllowed => ErrorResponse {
                message: self.to_string(),
                error: None,
                airtable_error: None,
            },
            AppError::Failed { message, source } => {
                tracing::error!(error = %source, "{}", message);
                ErrorResponse {
                    message: message.clone(),
                    error: Some(source.to_string()),
                    airtable_error: self.store_details().cloned(),
                }
            }
            AppError::Upstream(_) | AppError::Database { .. } | AppError::Internal(_) => {
                tracing::error!(error = %self, "Request failed");
                ErrorResponse {
                    message: "Internal server error".to_string(),
                    error: Some(self.to_string()),
                    airtable_error: self.store_details().cloned(),
                }
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_during_keeps_client_errors() {
        let err = AppError::NotFound("User not found".to_string()).during("Error fetching apps");
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_during_wraps_server_errors() {
        let err = AppError::database("boom").during("Error adding project");
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Error adding project: Record store error: boom");
    }

    #[test]
    fn test_store_details_survive_wrapping() {
        let details = serde_json::json!({"type": "INVALID_VALUE"});
        let err = AppError::Database {
            message: "422".to_string(),
            details: Some(details.clone()),
        }
        .during("Failed to post devlog");
        assert_eq!(err.store_details(), Some(&details));
    }
}
