//! Environment variable overrides, applied after the file is loaded.

use crate::schema::{BriefConfig, LogLevel};
use tracing::{info, warn};

pub const SERVER_URL_VAR: &str = "BRIEF_SERVER_URL";
pub const LOG_LEVEL_VAR: &str = "BRIEF_LOG_LEVEL";
pub const MARKER_VAR: &str = "BRIEF_STREAM_MARKER";

/// Apply overrides from the process environment.
pub fn apply_env_overrides(config: &mut BriefConfig) {
    apply_overrides_from(config, |key| std::env::var(key).ok());
}

/// Apply overrides using `lookup` to resolve variable names.
pub fn apply_overrides_from(config: &mut BriefConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(url) = lookup(SERVER_URL_VAR).filter(|v| !v.trim().is_empty()) {
        info!("server.base_url overridden by {SERVER_URL_VAR}");
        config.server.base_url = url.trim().to_string();
    }

    if let Some(level) = lookup(LOG_LEVEL_VAR) {
        match LogLevel::parse(&level) {
            Some(level) => config.logging.level = level,
            None => warn!("ignoring {LOG_LEVEL_VAR}={level}: unknown log level"),
        }
    }

    if let Some(marker) = lookup(MARKER_VAR).filter(|v| !v.is_empty()) {
        config.stream.marker = marker;
    }
}
