// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP client for the composer's calls into this API.

use crate::client::ClientError;
use crate::models::{DevlogSubmission, UserApp};
use serde::Deserialize;
use serde_json::Value;

/// Error body returned by the API on non-2xx responses.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub stack: Option<String>,
    #[serde(rename = "airtableError", default)]
    pub airtable_error: Option<Value>,
}

impl ApiErrorBody {
    /// Multi-line description with every diagnostic the server sent.
    pub fn details(&self) -> String {
        let mut details = self
            .message
            .clone()
            .unwrap_or_else(|| "Failed to post devlog".to_string());
        if let Some(error) = &self.error {
            details.push_str(&format!("\nError: {}", error));
        }
        if let Some(stack) = &self.stack {
            details.push_str(&format!("\nStack: {}", stack));
        }
        if let Some(airtable) = &self.airtable_error {
            details.push_str(&format!("\nAirtable: {}", airtable));
        }
        details
    }
}

#[derive(Deserialize)]
struct UserAppsResponse {
    #[serde(default)]
    apps: Vec<UserApp>,
}

#[derive(Deserialize)]
struct DevlogResponse {
    #[serde(default)]
    post: Value,
}

#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Apps the token's owner is a member of.
    pub async fn get_user_apps(&self, token: &str) -> Result<Vec<UserApp>, ClientError> {
        let response = self
            .client
            .get(format!("{}/api/getUserApps", self.base_url))
            .query(&[("token", token)])
            .send()
            .await?;
        let body: UserAppsResponse = Self::check(response).await?.json().await?;
        Ok(body.apps)
    }

    /// Submit a devlog; returns the created post.
    pub async fn post_devlog(&self, submission: &DevlogSubmission) -> Result<Value, ClientError> {
        let response = self
            .client
            .post(format!("{}/api/postDevlog", self.base_url))
            .json(submission)
            .send()
            .await?;
        let body: DevlogResponse = Self::check(response).await?.json().await?;
        Ok(body.post)
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        // A body that is not the usual error shape still yields the default message
        let body = response.json::<ApiErrorBody>().await.unwrap_or_default();
        Err(ClientError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    #[test]
    fn test_error_details_lines() {
        let body = ApiErrorBody {
            message: Some("Failed to post devlog".to_string()),
            error: Some("Record store error: 422".to_string()),
            stack: None,
            airtable_error: Some(json!({"type": "INVALID_VALUE"})),
        };
        assert_eq!(
            body.details(),
            "Failed to post devlog\nError: Record store error: 422\nAirtable: {\"type\":\"INVALID_VALUE\"}"
        );
        assert_eq!(ApiErrorBody::default().details(), "Failed to post devlog");
    }

    #[tokio::test]
    async fn test_get_user_apps() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/getUserApps")
            .match_query(Matcher::UrlEncoded(
                "token".into(),
                "tok_1234567890".into(),
            ))
            .with_status(200)
            .with_body(
                json!({"apps": [{
                    "id": "recA", "name": "Spaceship", "icon": null,
                    "appLink": "", "githubLink": "", "description": "",
                    "createdAt": null, "Images": [], "isHacktendo": null
                }]})
                .to_string(),
            )
            .create_async()
            .await;

        let api = ApiClient::new(reqwest::Client::new(), &server.url());
        let apps = api.get_user_apps("tok_1234567890").await.unwrap();
        assert_eq!(apps.len(), 1);
        assert_eq!(apps[0].name, "Spaceship");
    }

    #[tokio::test]
    async fn test_rejected_submission_keeps_diagnostics() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/postDevlog")
            .with_status(403)
            .with_body(r#"{"message":"You are not a member of this app"}"#)
            .create_async()
            .await;

        let api = ApiClient::new(reqwest::Client::new(), &server.url());
        let submission = DevlogSubmission {
            demo_video: "https://cdn.example.com/a.mp4".to_string(),
            photobooth_video: "https://cdn.example.com/b.mp4".to_string(),
            description: "hi".to_string(),
            neighbor: "tok_1234567890".to_string(),
            app: "Spaceship".to_string(),
        };
        let err = api.post_devlog(&submission).await.unwrap_err();

        assert!(matches!(err, ClientError::Rejected { status: 403, .. }));
        assert_eq!(err.inline_message(), "You are not a member of this app");
    }
}
