//! External media host client.
//!
//! The media host stores uploaded images and serves them from a public URL.
//! The storefront only forwards bytes; every call creates a new hosted
//! asset, so retried uploads duplicate (accepted limitation).

use std::sync::Arc;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde::Deserialize;
use thiserror::Error;
use tracing::instrument;

use crate::config::MediaHostConfig;

/// Errors that can occur when uploading to the media host.
#[derive(Debug, Error)]
pub enum MediaError {
    /// HTTP request failed (connect, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The media host returned a non-success status.
    #[error("media host returned status {status}: {detail}")]
    Upstream {
        /// HTTP status returned by the host.
        status: u16,
        /// Truncated response body for diagnostics. Never shown to clients.
        detail: String,
    },
}

/// A successfully hosted asset.
#[derive(Debug, Clone)]
pub struct UploadedAsset {
    /// Public URL of the asset.
    pub url: String,
}

/// Interface to the external media-hosting service.
///
/// `upload(bytes) -> { url }`; kept as a trait so the upload route can be
/// exercised against an in-memory fake.
#[async_trait]
pub trait MediaHost: Send + Sync {
    /// Forward an in-memory file buffer to the host, returning its public URL.
    async fn upload(
        &self,
        bytes: Vec<u8>,
        filename: Option<&str>,
    ) -> Result<UploadedAsset, MediaError>;
}

// =============================================================================
// HTTP implementation
// =============================================================================

/// Success body shape returned by the media host.
#[derive(Deserialize)]
struct UploadResultBody {
    secure_url: String,
}

/// Client for the external media host upload API.
#[derive(Clone)]
pub struct MediaClient {
    inner: Arc<MediaClientInner>,
}

struct MediaClientInner {
    client: reqwest::Client,
    upload_url: String,
    api_key: String,
}

impl MediaClient {
    /// Create a new media host client.
    #[must_use]
    pub fn new(config: &MediaHostConfig) -> Self {
        Self {
            inner: Arc::new(MediaClientInner {
                client: reqwest::Client::new(),
                upload_url: config.upload_url.clone(),
                api_key: config.api_key.expose_secret().to_string(),
            }),
        }
    }
}

#[async_trait]
impl MediaHost for MediaClient {
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    async fn upload(
        &self,
        bytes: Vec<u8>,
        filename: Option<&str>,
    ) -> Result<UploadedAsset, MediaError> {
        let mut part = reqwest::multipart::Part::bytes(bytes);
        if let Some(name) = filename {
            part = part.file_name(name.to_owned());
        }
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .inner
            .client
            .post(&self.inner.upload_url)
            .header("Authorization", format!("Bearer {}", self.inner.api_key))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        let response_text = response.text().await?;

        if !status.is_success() {
            return Err(MediaError::Upstream {
                status: status.as_u16(),
                detail: response_text.chars().take(200).collect(),
            });
        }

        let body: UploadResultBody = serde_json::from_str(&response_text)?;

        Ok(UploadedAsset {
            url: body.secure_url,
        })
    }
}
