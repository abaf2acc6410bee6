//! Event-stream framing configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// Line prefix that marks an event payload.
    pub marker: String,
    /// Take the event kind from a preceding `event:` line when the payload
    /// object has no `event` field of its own.
    pub sse_event_fallback: bool,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            marker: "data: ".into(),
            sse_event_fallback: true,
        }
    }
}
