//! Folding events into render-ready session state.

use brief_common::SessionId;
use serde::Serialize;

use crate::event::{Event, EventKind};

/// Lifecycle of one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Idle,
    Running,
    Completed,
    Failed,
}

impl SessionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// Everything the presentation layer needs about the live session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionState {
    pub session: SessionId,
    pub status: SessionStatus,
    pub busy: bool,
    /// Every event received, in arrival order. Append-only.
    pub event_log: Vec<Event>,
    /// Concatenated `token` text, whitespace intact.
    pub display_text: String,
    pub exported_paths: Vec<String>,
    pub final_result: Option<serde_json::Value>,
    pub token_count: usize,
    pub last_event: Option<EventKind>,
}

impl SessionState {
    /// Empty, idle state.
    pub fn new(session: SessionId) -> Self {
        Self {
            session,
            status: SessionStatus::Idle,
            busy: false,
            event_log: Vec::new(),
            display_text: String::new(),
            exported_paths: Vec::new(),
            final_result: None,
            token_count: 0,
            last_event: None,
        }
    }

    /// Empty state for a submission that has just started.
    pub fn running(session: SessionId) -> Self {
        Self {
            status: SessionStatus::Running,
            busy: true,
            ..Self::new(session)
        }
    }

    /// Route `event` into its specialized field, then log it.
    ///
    /// Touches nothing but `self`; `busy` and `status` belong to the
    /// controller and are never changed here.
    pub fn apply(&mut self, event: Event) {
        match &event {
            Event::Token { text } => {
                self.display_text.push_str(text);
                self.token_count += 1;
            }
            Event::Export { out_dir } => self.exported_paths.push(out_dir.clone()),
            Event::Final { spec } => self.final_result = Some(spec.clone()),
            Event::Phase { .. } | Event::Status { .. } | Event::OpsPatch { .. } | Event::Error { .. } => {}
        }
        self.last_event = Some(event.kind());
        self.event_log.push(event);
    }

    /// Last producer- or controller-emitted error message, if any.
    pub fn last_error(&self) -> Option<&str> {
        self.event_log.iter().rev().find_map(|event| match event {
            Event::Error { error } => Some(error.as_str()),
            _ => None,
        })
    }
}

/// Pure reducer: the next state after `event`.
pub fn reduce(mut state: SessionState, event: Event) -> SessionState {
    state.apply(event);
    state
}

/// Fold a whole event sequence.
pub fn replay(state: SessionState, events: impl IntoIterator<Item = Event>) -> SessionState {
    events.into_iter().fold(state, reduce)
}
