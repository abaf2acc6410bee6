//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# brief configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[server]
# base_url = "http://localhost:8000"
# stream_path = "/api/design/stream"
# sync_path = "/api/design/sync"
# connect_timeout_secs = 10    # 1-300
# request_timeout_secs = 0     # 0 = no limit, otherwise 1-86400

[stream]
# marker = "data: "            # prefix of event lines
# sse_event_fallback = true    # use `event:` lines when the payload has no kind

[logging]
# level = "info"               # trace, debug, info, warn, error
"##
    .to_string()
}
