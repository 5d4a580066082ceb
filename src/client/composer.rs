// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Devlog composer state.
//!
//! Holds the two video slots, the description and the selected app, and
//! submits once everything is filled in. Both slots may upload at once;
//! nothing else is shared between them.

use crate::client::api::ApiClient;
use crate::client::cues::{Cue, CueSink};
use crate::client::media::{MediaSlot, Selection, SlotKind};
use crate::client::upload::{MediaFile, VideoUploader};
use crate::client::{ClientConfig, ClientError};
use crate::models::{DevlogSubmission, UserApp};
use serde_json::Value;
use std::sync::Arc;

pub struct DevlogComposer {
    api: ApiClient,
    uploader: VideoUploader,
    cues: Arc<dyn CueSink>,
    token: String,
    demo: MediaSlot,
    photobooth: MediaSlot,
    description: String,
    /// Spaces typed so far, for the keystroke note cycle
    keystrokes: usize,
    apps: Vec<UserApp>,
    selected_app: Option<String>,
    posting: bool,
}

impl DevlogComposer {
    pub fn new(config: &ClientConfig, token: &str, cues: Arc<dyn CueSink>) -> Self {
        let client = reqwest::Client::new();
        Self {
            api: ApiClient::new(client.clone(), &config.api_base_url),
            uploader: VideoUploader::new(client, &config.upload_url, token),
            cues,
            token: token.to_string(),
            demo: MediaSlot::new(SlotKind::Demo),
            photobooth: MediaSlot::new(SlotKind::Photobooth),
            description: String::new(),
            keystrokes: 0,
            apps: vec![],
            selected_app: None,
            posting: false,
        }
    }

    pub fn slot(&self, kind: SlotKind) -> &MediaSlot {
        match kind {
            SlotKind::Demo => &self.demo,
            SlotKind::Photobooth => &self.photobooth,
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn apps(&self) -> &[UserApp] {
        &self.apps
    }

    pub fn selected_app(&self) -> Option<&str> {
        self.selected_app.as_deref()
    }

    pub fn is_posting(&self) -> bool {
        self.posting
    }

    /// Fetch the caller's apps.
    pub async fn load_apps(&mut self) -> Result<&[UserApp], ClientError> {
        let apps = self.api.get_user_apps(&self.token).await?;
        self.set_apps(apps);
        Ok(&self.apps)
    }

    /// Replace the app list, selecting the app when there is exactly one.
    pub fn set_apps(&mut self, apps: Vec<UserApp>) {
        if let [only] = apps.as_slice() {
            self.selected_app = Some(only.id.clone());
        }
        self.apps = apps;
    }

    pub fn select_app(&mut self, app_id: &str) {
        self.selected_app = Some(app_id.to_string());
    }

    /// Update the description, playing a note whenever a space is appended.
    pub fn set_description(&mut self, value: &str) {
        if value.len() > self.description.len() && value.ends_with(' ') {
            self.cues.play(Cue::Keystroke(self.keystrokes));
            self.keystrokes += 1;
        }
        self.description = value.to_string();
    }

    pub async fn upload(&mut self, kind: SlotKind, file: &MediaFile) -> Selection {
        let slot = match kind {
            SlotKind::Demo => &mut self.demo,
            SlotKind::Photobooth => &mut self.photobooth,
        };
        slot.upload(file, &self.uploader, self.cues.as_ref()).await
    }

    /// Upload into both slots concurrently.
    pub async fn upload_both(
        &mut self,
        demo: &MediaFile,
        photobooth: &MediaFile,
    ) -> (Selection, Selection) {
        let cues = self.cues.as_ref();
        tokio::join!(
            self.demo.upload(demo, &self.uploader, cues),
            self.photobooth.upload(photobooth, &self.uploader, cues),
        )
    }

    pub fn can_submit(&self) -> bool {
        !self.posting && self.submission().is_some()
    }

    /// Submission for the current state, if every field is filled in.
    fn submission(&self) -> Option<DevlogSubmission> {
        let demo = self.demo.url()?;
        let photobooth = self.photobooth.url()?;
        let app_id = self.selected_app.as_deref()?;
        if self.description.trim().is_empty() {
            return None;
        }

        // The API resolves apps by name first, as the selector shows them
        let app = self
            .apps
            .iter()
            .find(|a| a.id == app_id)
            .map_or(app_id, |a| a.name.as_str());

        Some(DevlogSubmission {
            demo_video: demo.to_string(),
            photobooth_video: photobooth.to_string(),
            description: self.description.clone(),
            neighbor: self.token.clone(),
            app: app.to_string(),
        })
    }

    /// Send the devlog. Returns the created post.
    pub async fn submit(&mut self) -> Result<Value, ClientError> {
        self.cues.play(Cue::ButtonPress);
        let submission = self.submission().ok_or(ClientError::Incomplete)?;

        self.posting = true;
        let result = self.api.post_devlog(&submission).await;
        self.posting = false;

        match &result {
            Ok(_) => {
                tracing::info!(app = %submission.app, "Devlog submitted");
                self.cues.play(Cue::Success);
            }
            Err(e) => tracing::warn!(error = %e, "Devlog submission failed"),
        }
        result
    }
}
