//! Generation service endpoint configuration.

use serde::{Deserialize, Serialize};

/// Where the generation service lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Scheme, host and port, without a trailing slash.
    pub base_url: String,
    /// Path of the streaming (event-stream) endpoint.
    pub stream_path: String,
    /// Path of the synchronous endpoint.
    pub sync_path: String,
    pub connect_timeout_secs: u32,
    /// Whole-request timeout. `0` disables it, since generations run for minutes.
    pub request_timeout_secs: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".into(),
            stream_path: "/api/design/stream".into(),
            sync_path: "/api/design/sync".into(),
            connect_timeout_secs: 10,
            request_timeout_secs: 0,
        }
    }
}

impl ServerConfig {
    pub fn stream_url(&self) -> String {
        join_url(&self.base_url, &self.stream_path)
    }

    pub fn sync_url(&self) -> String {
        join_url(&self.base_url, &self.sync_path)
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
