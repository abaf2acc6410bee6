//! HTTP client for the generation service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use tracing::debug;

use crate::reader::{response_chunks, ChunkStream};
use crate::{GenerationBackend, StreamError};

const DEFAULT_BASE_URL: &str = "http://localhost:8000";
const STREAM_PATH: &str = "/api/design/stream";
const SYNC_PATH: &str = "/api/design/sync";

/// Longest error body kept in [`StreamError::HttpStatus`].
const MAX_ERROR_BODY: usize = 512;

/// Generation client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub stream_url: String,
    pub sync_url: String,
    pub connect_timeout: Duration,
    /// `None` leaves long generations unbounded.
    pub request_timeout: Option<Duration>,
}

impl ClientConfig {
    /// Config for a service at `base_url` using the standard endpoint paths.
    pub fn new(base_url: impl AsRef<str>) -> Self {
        let base = base_url.as_ref().trim_end_matches('/');
        Self {
            stream_url: format!("{base}{STREAM_PATH}"),
            sync_url: format!("{base}{SYNC_PATH}"),
            connect_timeout: Duration::from_secs(10),
            request_timeout: None,
        }
    }

    pub fn with_stream_url(mut self, url: impl Into<String>) -> Self {
        self.stream_url = url.into();
        self
    }

    pub fn with_sync_url(mut self, url: impl Into<String>) -> Self {
        self.sync_url = url.into();
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// Generation service client.
pub struct GenerationClient {
    config: ClientConfig,
    http: reqwest::Client,
}

impl GenerationClient {
    pub fn new(config: ClientConfig) -> Result<Self, StreamError> {
        let mut builder = reqwest::Client::builder().connect_timeout(config.connect_timeout);
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| StreamError::Transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Run a whole generation on the synchronous endpoint and return its
    /// JSON result.
    pub async fn generate(&self, brief: &serde_json::Value) -> Result<serde_json::Value, StreamError> {
        debug!(url = %self.config.sync_url, "synchronous generation request");

        let response = self
            .http
            .post(&self.config.sync_url)
            .header(CONTENT_TYPE, "application/json")
            .json(brief)
            .send()
            .await
            .map_err(|e| StreamError::Transport(e.to_string()))?;

        let response = check_status(response).await?;
        response
            .json()
            .await
            .map_err(|e| StreamError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl GenerationBackend for GenerationClient {
    async fn open_stream(&self, brief: &serde_json::Value) -> Result<ChunkStream, StreamError> {
        debug!(url = %self.config.stream_url, "opening generation stream");

        let response = self
            .http
            .post(&self.config.stream_url)
            .header(ACCEPT, "text/event-stream")
            .header(CONTENT_TYPE, "application/json")
            .json(brief)
            .send()
            .await
            .map_err(|e| StreamError::Transport(e.to_string()))?;

        let response = check_status(response).await?;
        Ok(response_chunks(response))
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, StreamError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let mut body = response.text().await.unwrap_or_default();
    if body.len() > MAX_ERROR_BODY {
        let mut cut = MAX_ERROR_BODY;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
    }
    Err(StreamError::HttpStatus {
        status: status.as_u16(),
        body,
    })
}
