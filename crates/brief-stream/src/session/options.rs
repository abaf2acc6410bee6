//! Pipeline tuning shared by every session of a controller.

use crate::parser::{EventParser, DEFAULT_MARKER};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Line prefix that marks an event payload.
    pub marker: String,
    /// Honor SSE `event:` lines for payloads without a kind.
    pub sse_event_fallback: bool,
}

impl PipelineOptions {
    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = marker.into();
        self
    }

    pub fn with_sse_event_fallback(mut self, enabled: bool) -> Self {
        self.sse_event_fallback = enabled;
        self
    }

    pub(crate) fn parser(&self) -> EventParser {
        EventParser::new(self.marker.clone()).with_sse_event_fallback(self.sse_event_fallback)
    }
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            marker: DEFAULT_MARKER.to_string(),
            sse_event_fallback: true,
        }
    }
}
