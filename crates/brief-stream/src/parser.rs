//! Event line recognition and payload decoding.

use serde_json::Value;
use tracing::{debug, trace};

use crate::event::Event;

/// Marker used by the generation service's event stream.
pub const DEFAULT_MARKER: &str = "data: ";

const TAG_FIELD: &str = "event";
const SSE_EVENT_FIELD: &str = "event:";

/// Decode a single complete line, with no cross-line state.
///
/// Returns `None` for lines without `marker` and for malformed payloads.
pub fn parse_line(marker: &str, line: &str) -> Option<Event> {
    let line = strip_cr(line);
    let payload = line.strip_prefix(marker)?;
    decode_payload(payload, None).ok()
}

/// Line parser for one stream.
///
/// Besides the marker lines it tracks standard SSE `event:` lines: when the
/// fallback is enabled and a payload object has no `event` field, the kind
/// named by the preceding `event:` line is used. A blank line ends that
/// association.
#[derive(Debug)]
pub struct EventParser {
    marker: String,
    sse_event_fallback: bool,
    pending_kind: Option<String>,
    dropped: u64,
}

impl EventParser {
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
            sse_event_fallback: true,
            pending_kind: None,
            dropped: 0,
        }
    }

    pub fn with_sse_event_fallback(mut self, enabled: bool) -> Self {
        self.sse_event_fallback = enabled;
        self
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Number of marker lines whose payload could not be decoded.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Parse one complete line. Never fails; anything that is not a
    /// well-formed event yields `None`.
    pub fn parse(&mut self, line: &str) -> Option<Event> {
        let line = strip_cr(line);

        if line.is_empty() {
            self.pending_kind = None;
            return None;
        }

        if let Some(payload) = line.strip_prefix(self.marker.as_str()) {
            let fallback = if self.sse_event_fallback {
                self.pending_kind.as_deref()
            } else {
                None
            };
            return match decode_payload(payload, fallback) {
                Ok(event) => Some(event),
                Err(e) => {
                    self.dropped += 1;
                    debug!(error = %e, len = payload.len(), "dropping malformed event payload");
                    None
                }
            };
        }

        if self.sse_event_fallback {
            if let Some(kind) = line.strip_prefix(SSE_EVENT_FIELD) {
                self.pending_kind = Some(kind.trim().to_string());
                return None;
            }
        }

        trace!("ignoring non-event line");
        None
    }
}

impl Default for EventParser {
    fn default() -> Self {
        Self::new(DEFAULT_MARKER)
    }
}

fn strip_cr(line: &str) -> &str {
    line.strip_suffix('\r').unwrap_or(line)
}

fn decode_payload(payload: &str, fallback_kind: Option<&str>) -> Result<Event, serde_json::Error> {
    let mut value: Value = serde_json::from_str(payload.trim())?;
    if let (Some(kind), Value::Object(map)) = (fallback_kind, &mut value) {
        if !map.contains_key(TAG_FIELD) {
            map.insert(TAG_FIELD.to_string(), Value::String(kind.to_string()));
        }
    }
    serde_json::from_value(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_marked_line() {
        let event = parse_line("EVT ", r#"EVT {"event":"phase","text":"setup"}"#);
        assert_eq!(
            event,
            Some(Event::Phase {
                text: "setup".into()
            })
        );
    }

    #[test]
    fn unmarked_lines_are_ignored() {
        let mut parser = EventParser::default();
        assert_eq!(parser.parse(": keep-alive"), None);
        assert_eq!(parser.parse("id: 7"), None);
        assert_eq!(parser.parse("retry: 3000"), None);
        assert_eq!(parser.parse(r#"{"event":"token","text":"x"}"#), None);
        assert_eq!(parser.dropped(), 0);
    }

    #[test]
    fn malformed_payload_is_dropped_and_counted() {
        let mut parser = EventParser::new("EVT ");
        assert_eq!(parser.parse(r#"EVT {"event":"tok"#), None);
        assert_eq!(parser.parse(r#"EVT {"event":"nope","text":"x"}"#), None);
        assert_eq!(parser.parse("EVT [1, 2"), None);
        assert_eq!(parser.dropped(), 3);

        // The parser keeps working after bad frames.
        assert_eq!(
            parser.parse(r#"EVT {"event":"status","text":"ok"}"#),
            Some(Event::Status { text: "ok".into() })
        );
    }

    #[test]
    fn crlf_framing_is_accepted() {
        let mut parser = EventParser::default();
        let event = parser.parse("data: {\"event\":\"token\",\"text\":\" a \"}\r");
        assert_eq!(event, Some(Event::Token { text: " a ".into() }));
    }

    #[test]
    fn sse_event_line_supplies_missing_kind() {
        let mut parser = EventParser::default();
        assert_eq!(parser.parse("event: export\r"), None);
        assert_eq!(
            parser.parse(r#"data: {"out_dir": "ui-agent-output"}"#),
            Some(Event::Export {
                out_dir: "ui-agent-output".into()
            })
        );
        assert_eq!(parser.parse("\r"), None);

        // After the blank line the association is gone.
        assert_eq!(parser.parse(r#"data: {"text": "orphan"}"#), None);
        assert_eq!(parser.dropped(), 1);
    }

    #[test]
    fn payload_kind_wins_over_sse_event_line() {
        let mut parser = EventParser::default();
        parser.parse("event: status");
        let event = parser.parse(r#"data: {"event": "phase", "text": "layout"}"#);
        assert_eq!(
            event,
            Some(Event::Phase {
                text: "layout".into()
            })
        );
    }

    #[test]
    fn fallback_can_be_disabled() {
        let mut parser = EventParser::default().with_sse_event_fallback(false);
        parser.parse("event: token");
        assert_eq!(parser.parse(r#"data: {"text": "x"}"#), None);
        assert_eq!(parser.dropped(), 1);
    }

    #[test]
    fn final_spec_is_kept_verbatim() {
        let spec = json!({"designSystem": {"palette": {"primary": "#0EA5E9"}}, "files": ["app/page.tsx"]});
        let line = format!("data: {}", json!({"event": "final", "spec": spec}));
        assert_eq!(parse_line(DEFAULT_MARKER, &line), Some(Event::Final { spec }));
    }
}
