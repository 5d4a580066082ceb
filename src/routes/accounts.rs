// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Account linking and Hacktendo sign-up.

use crate::error::Result;
use crate::routes::extract::{method_not_allowed, ValidJson};
use crate::routes::projects::MessageResponse;
use crate::services::otp::generate_otp;
use crate::validation::EMAIL_RE;
use crate::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/isAccountLinked",
            post(is_account_linked).fallback(method_not_allowed),
        )
        .route(
            "/api/sendOTPHacktendoSignup",
            post(send_otp_hacktendo_signup).fallback(method_not_allowed),
        )
}

#[derive(Deserialize, Validate)]
struct EmailRequest {
    #[validate(regex(path = *EMAIL_RE))]
    email: String,
}

impl EmailRequest {
    fn normalized(&self) -> String {
        self.email.trim().to_lowercase()
    }
}

#[derive(Serialize)]
struct LinkedResponse {
    linked: bool,
}

#[derive(Serialize)]
struct NotLinkedResponse {
    error: &'static str,
}

/// Whether a neighbor record exists for an email.
async fn is_account_linked(
    State(state): State<Arc<AppState>>,
    ValidJson(req): ValidJson<EmailRequest>,
) -> Result<Response> {
    let neighbor = state
        .db
        .neighbor_by_email(&req.normalized())
        .await
        .map_err(|e| e.during("Error checking account"))?;

    Ok(match neighbor {
        Some(_) => Json(LinkedResponse { linked: true }).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(NotLinkedResponse {
                error: "No account found with that email.",
            }),
        )
            .into_response(),
    })
}

/// Store a fresh OTP, mail it, and flag the neighbor (if any) as signed up.
async fn send_otp_hacktendo_signup(
    State(state): State<Arc<AppState>>,
    ValidJson(req): ValidJson<EmailRequest>,
) -> Result<Json<MessageResponse>> {
    let email = req.normalized();
    let code = generate_otp(&state.rng)?;

    state
        .db
        .create_otp(&email, &code)
        .await
        .map_err(|e| e.during("Failed to send OTP"))?;

    state
        .loops
        .send_otp(&email, &code)
        .await
        .map_err(|e| e.during("Failed to send OTP"))?;

    match state
        .db
        .neighbor_by_email(&email)
        .await
        .map_err(|e| e.during("Failed to send OTP"))?
    {
        Some(neighbor) => {
            state
                .db
                .mark_hacktendo_signup(&neighbor.id)
                .await
                .map_err(|e| e.during("Failed to send OTP"))?;
            tracing::info!(neighbor_id = %neighbor.id, "Hacktendo sign-up flagged");
        }
        None => tracing::debug!("OTP sent to email without a neighbor record"),
    }

    Ok(Json(MessageResponse {
        message: "OTP sent successfully".to_string(),
    }))
}
