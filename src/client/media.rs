// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Named media slots and their upload state machine.

use crate::client::cues::{Cue, CueSink};
use crate::client::upload::{MediaFile, UploadProgress, VideoUploader};
use tokio::sync::mpsc;

/// Progress points announced during an upload.
pub const MILESTONES: [f64; 5] = [0.0, 0.25, 0.5, 0.75, 1.0];

/// Announces each milestone at most once per upload.
#[derive(Debug, Default, Clone)]
pub struct MilestoneTracker {
    last: Option<usize>,
}

impl MilestoneTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cue for `fraction` if it reached a milestone not yet announced.
    ///
    /// Progress that moves backwards or stays within the same milestone
    /// produces nothing.
    pub fn observe(&mut self, fraction: f64) -> Option<Cue> {
        let idx = MILESTONES.iter().rposition(|m| fraction >= *m)?;
        if self.last.is_some_and(|last| idx <= last) {
            return None;
        }
        self.last = Some(idx);
        Some(Cue::Milestone(MILESTONES[idx]))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotKind {
    Demo,
    Photobooth,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SlotState {
    Idle,
    Uploading { progress: f64 },
    Uploaded { url: String },
    Failed { message: String },
}

/// Outcome of offering a file to a slot.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    /// Not a video; the slot is unchanged.
    Ignored,
    Uploaded(String),
    Failed(String),
}

/// One of the composer's two video inputs.
#[derive(Debug, Clone)]
pub struct MediaSlot {
    kind: SlotKind,
    state: SlotState,
    /// Local preview of the last selected file
    preview: Option<String>,
    milestones: MilestoneTracker,
}

impl MediaSlot {
    pub fn new(kind: SlotKind) -> Self {
        Self {
            kind,
            state: SlotState::Idle,
            preview: None,
            milestones: MilestoneTracker::new(),
        }
    }

    pub fn kind(&self) -> SlotKind {
        self.kind
    }

    pub fn state(&self) -> &SlotState {
        &self.state
    }

    pub fn preview(&self) -> Option<&str> {
        self.preview.as_deref()
    }

    /// Remote URL once uploaded.
    pub fn url(&self) -> Option<&str> {
        match &self.state {
            SlotState::Uploaded { url } => Some(url),
            _ => None,
        }
    }

    pub fn is_uploading(&self) -> bool {
        matches!(self.state, SlotState::Uploading { .. })
    }

    /// Start tracking a new upload. Returns `false` for non-video files.
    pub fn begin(&mut self, file: &MediaFile) -> bool {
        if !file.is_video() {
            tracing::debug!(
                slot = ?self.kind,
                content_type = %file.content_type,
                "Ignoring non-video file"
            );
            return false;
        }
        self.preview = Some(file.name.clone());
        self.state = SlotState::Uploading { progress: 0.0 };
        self.milestones = MilestoneTracker::new();
        true
    }

    /// Record progress; returns a milestone cue when one is newly reached.
    pub fn progress(&mut self, fraction: f64) -> Option<Cue> {
        if let SlotState::Uploading { progress } = &mut self.state {
            *progress = fraction;
            self.milestones.observe(fraction)
        } else {
            None
        }
    }

    pub fn complete(&mut self, url: String) {
        self.state = SlotState::Uploaded { url };
    }

    /// Drop any URL and reset progress. The user must pick the file again.
    pub fn fail(&mut self, message: String) {
        self.state = SlotState::Failed { message };
    }

    /// Upload `file` into this slot, playing cues along the way.
    pub async fn upload(
        &mut self,
        file: &MediaFile,
        uploader: &VideoUploader,
        cues: &dyn CueSink,
    ) -> Selection {
        if !self.begin(file) {
            return Selection::Ignored;
        }
        cues.play(Cue::UploadStarted);

        let (tx, mut rx) = mpsc::unbounded_channel::<UploadProgress>();
        let upload = uploader.upload(file, tx);
        tokio::pin!(upload);

        let result = loop {
            tokio::select! {
                result = &mut upload => break result,
                Some(p) = rx.recv() => {
                    if let Some(cue) = self.progress(p.fraction()) {
                        cues.play(cue);
                    }
                }
            }
        };
        // Events queued before the upload future resolved
        while let Ok(p) = rx.try_recv() {
            if let Some(cue) = self.progress(p.fraction()) {
                cues.play(cue);
            }
        }

        match result {
            Ok(url) => {
                tracing::info!(slot = ?self.kind, %url, "Video uploaded");
                self.complete(url.clone());
                cues.play(Cue::Success);
                Selection::Uploaded(url)
            }
            Err(e) => {
                tracing::warn!(slot = ?self.kind, error = %e, "Video upload failed");
                let message = e.to_string();
                self.fail(message.clone());
                Selection::Failed(message)
            }
        }
    }
}
