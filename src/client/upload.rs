// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Video uploads with progress reporting.

use crate::client::ClientError;
use bytes::Bytes;
use futures_util::stream;
use reqwest::multipart::{Form, Part};
use reqwest::Body;
use serde::Deserialize;
use tokio::sync::mpsc;

/// Bytes handed to the HTTP body per progress step.
const CHUNK_SIZE: usize = 64 * 1024;

/// A file picked or dropped by the user.
#[derive(Debug, Clone)]
pub struct MediaFile {
    pub name: String,
    /// MIME type as reported by the picker
    pub content_type: String,
    pub bytes: Bytes,
}

impl MediaFile {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: Bytes) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    pub fn is_video(&self) -> bool {
        self.content_type.starts_with("video/")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadProgress {
    pub sent: u64,
    pub total: u64,
}

impl UploadProgress {
    /// Fraction sent in `[0, 1]`. An empty file counts as complete.
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            (self.sent as f64 / self.total as f64).min(1.0)
        }
    }
}

#[derive(Deserialize)]
struct UploadResponse {
    url: String,
}

/// Client for the video storage endpoint.
#[derive(Clone)]
pub struct VideoUploader {
    client: reqwest::Client,
    upload_url: String,
    token: String,
}

impl VideoUploader {
    pub fn new(client: reqwest::Client, upload_url: &str, token: &str) -> Self {
        Self {
            client,
            upload_url: upload_url.to_string(),
            token: token.to_string(),
        }
    }

    /// Upload `file` as a multipart form and return its remote URL.
    ///
    /// Progress is sent as each chunk is handed to the request body. The
    /// receiver may be dropped at any time without affecting the upload.
    pub async fn upload(
        &self,
        file: &MediaFile,
        progress: mpsc::UnboundedSender<UploadProgress>,
    ) -> Result<String, ClientError> {
        let total = file.bytes.len() as u64;
        let _ = progress.send(UploadProgress { sent: 0, total });

        let chunks: Vec<Bytes> = (0..file.bytes.len())
            .step_by(CHUNK_SIZE)
            .map(|start| file.bytes.slice(start..(start + CHUNK_SIZE).min(file.bytes.len())))
            .collect();

        let mut sent = 0u64;
        let body = stream::iter(chunks.into_iter().map(move |chunk| {
            sent += chunk.len() as u64;
            let _ = progress.send(UploadProgress { sent, total });
            Ok::<Bytes, std::io::Error>(chunk)
        }));

        let part = Part::stream_with_length(Body::wrap_stream(body), total)
            .file_name(file.name.clone())
            .mime_str(&file.content_type)?;
        let form = Form::new()
            .text("token", self.token.clone())
            .part("file", part);

        tracing::debug!(file = %file.name, bytes = total, "Uploading video");

        let response = self
            .client
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = %status, file = %file.name, "Video upload rejected");
            return Err(ClientError::UploadFailed);
        }

        let body: UploadResponse = response.json().await?;
        Ok(body.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn video(len: usize) -> MediaFile {
        MediaFile::new("demo.mp4", "video/mp4", Bytes::from(vec![7u8; len]))
    }

    #[test]
    fn test_video_detection() {
        assert!(video(1).is_video());
        assert!(!MediaFile::new("a.png", "image/png", Bytes::new()).is_video());
    }

    #[test]
    fn test_progress_fraction() {
        assert_eq!(UploadProgress { sent: 0, total: 0 }.fraction(), 1.0);
        assert_eq!(UploadProgress { sent: 50, total: 200 }.fraction(), 0.25);
    }

    #[tokio::test]
    async fn test_upload_reports_progress_and_returns_url() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/video/upload")
            .match_body(Matcher::Regex("name=\"token\"".to_string()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"url":"https://cdn.example.com/v/1.mp4"}"#)
            .create_async()
            .await;

        let uploader = VideoUploader::new(
            reqwest::Client::new(),
            &format!("{}/video/upload", server.url()),
            "tok_1234567890",
        );
        let (tx, mut rx) = mpsc::unbounded_channel();
        let len = CHUNK_SIZE * 3 + 10;
        let url = uploader.upload(&video(len), tx).await.unwrap();

        assert_eq!(url, "https://cdn.example.com/v/1.mp4");
        mock.assert_async().await;

        let mut events = vec![];
        while let Ok(p) = rx.try_recv() {
            events.push(p);
        }
        assert_eq!(events.first().map(|p| p.sent), Some(0));
        assert_eq!(events.last().map(|p| p.sent), Some(len as u64));
        assert!(events.windows(2).all(|w| w[0].sent <= w[1].sent));
    }

    #[tokio::test]
    async fn test_upload_failure_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/video/upload")
            .with_status(500)
            .create_async()
            .await;

        let uploader = VideoUploader::new(
            reqwest::Client::new(),
            &format!("{}/video/upload", server.url()),
            "tok_1234567890",
        );
        let (tx, _rx) = mpsc::unbounded_channel();
        let err = uploader.upload(&video(16), tx).await.unwrap_err();
        assert!(matches!(err, ClientError::UploadFailed));
    }
}
