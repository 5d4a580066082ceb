// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Loops transactional email client.

use crate::error::AppError;
use serde::Serialize;

/// Loops API client.
#[derive(Clone)]
pub struct LoopsClient {
    http: reqwest::Client,
    base_url: String,
    auth_token: String,
    otp_transactional_id: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TransactionalEmail<'a> {
    transactional_id: &'a str,
    email: &'a str,
    data_variables: OtpVariables<'a>,
}

#[derive(Serialize)]
struct OtpVariables<'a> {
    otp: &'a str,
}

impl LoopsClient {
    pub fn new(base_url: &str, auth_token: &str, otp_transactional_id: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_token: auth_token.to_string(),
            otp_transactional_id: otp_transactional_id.to_string(),
        }
    }

    /// Send the sign-in code email.
    pub async fn send_otp(&self, email: &str, otp: &str) -> Result<(), AppError> {
        if self.auth_token.is_empty() {
            return Err(AppError::Upstream(
                "Loops auth token is not configured".to_string(),
            ));
        }

        let body = TransactionalEmail {
            transactional_id: &self.otp_transactional_id,
            email,
            data_variables: OtpVariables { otp },
        };

        let response = self
            .http
            .post(format!("{}/transactional", self.base_url))
            .bearer_auth(&self.auth_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Loops request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream(format!("Loops HTTP {}: {}", status, text)));
        }

        tracing::info!("OTP email sent");
        Ok(())
    }
}
