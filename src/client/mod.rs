// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Devlog composer client: video uploads with progress and audible cues,
//! then submission to the API.

pub mod api;
pub mod composer;
pub mod cues;
pub mod media;
pub mod upload;

pub use api::{ApiClient, ApiErrorBody};
pub use composer::DevlogComposer;
pub use cues::{Cue, CueSink, TracingCueSink};
pub use media::{MediaSlot, MilestoneTracker, Selection, SlotKind, SlotState};
pub use upload::{MediaFile, UploadProgress, VideoUploader};

/// Where uploaded videos are stored unless configured otherwise.
pub const DEFAULT_UPLOAD_URL: &str = "https://express.neighborhood.hackclub.com/video/upload";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of this API, e.g. `http://localhost:8080`
    pub api_base_url: String,
    pub upload_url: String,
}

impl ClientConfig {
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            upload_url: DEFAULT_UPLOAD_URL.to_string(),
        }
    }
}

/// Client-side failures while uploading or submitting.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Failed to upload video")]
    UploadFailed,

    #[error("Please fill out all fields and upload both videos.")]
    Incomplete,

    #[error("{}", .body.details())]
    Rejected { status: u16, body: ApiErrorBody },

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),
}

impl ClientError {
    /// Message shown inline under the submit button.
    pub fn inline_message(&self) -> String {
        match self {
            ClientError::Http(e) => format!("Failed to post devlog: {}", e),
            other => other.to_string(),
        }
    }
}
