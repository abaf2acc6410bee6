//! Typed events carried by the generation stream.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One event from the generation service, tagged by its `event` field.
///
/// Payloads with an unknown kind or a missing field fail to deserialize and
/// are treated as malformed frames by the parser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    /// A pipeline phase started, e.g. `design_system`.
    Phase { text: String },
    /// A fragment of generated text. Whitespace is significant.
    Token { text: String },
    /// Free-form progress narration.
    Status { text: String },
    /// Incremental operations patch, narrated like a status line.
    OpsPatch { text: String },
    /// Generated files were written to `out_dir`.
    Export {
        #[serde(alias = "text")]
        out_dir: String,
    },
    /// The finished design specification.
    Final { spec: serde_json::Value },
    /// A failure reported by the service, or synthesized by the controller.
    Error {
        #[serde(alias = "message")]
        error: String,
    },
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Phase { .. } => EventKind::Phase,
            Self::Token { .. } => EventKind::Token,
            Self::Status { .. } => EventKind::Status,
            Self::OpsPatch { .. } => EventKind::OpsPatch,
            Self::Export { .. } => EventKind::Export,
            Self::Final { .. } => EventKind::Final,
            Self::Error { .. } => EventKind::Error,
        }
    }

    /// `final` and `error` signal that the producer is done.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Final { .. } | Self::Error { .. })
    }
}

/// Discriminant of [`Event`], for summaries and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Phase,
    Token,
    Status,
    OpsPatch,
    Export,
    Final,
    Error,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Phase => "phase",
            Self::Token => "token",
            Self::Status => "status",
            Self::OpsPatch => "ops_patch",
            Self::Export => "export",
            Self::Final => "final",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
