//! Server section validation (URL shape, paths, timeouts).

use crate::schema::BriefConfig;

use super::helpers::{validate_non_empty, validate_range};

pub(crate) fn validate_server(errors: &mut Vec<String>, config: &BriefConfig) {
    let server = &config.server;

    validate_non_empty(errors, "server.base_url", &server.base_url);
    if !server.base_url.trim().is_empty()
        && !(server.base_url.starts_with("http://") || server.base_url.starts_with("https://"))
    {
        errors.push(format!(
            "server.base_url = {:?} must start with http:// or https://",
            server.base_url
        ));
    }

    for (name, path) in [
        ("server.stream_path", &server.stream_path),
        ("server.sync_path", &server.sync_path),
    ] {
        if !path.starts_with('/') {
            errors.push(format!("{name} = {path:?} must start with '/'"));
        }
    }

    validate_range(
        errors,
        "server.connect_timeout_secs",
        server.connect_timeout_secs,
        1,
        300,
    );
    if server.request_timeout_secs != 0 {
        validate_range(
            errors,
            "server.request_timeout_secs",
            server.request_timeout_secs,
            1,
            86_400,
        );
    }
}
