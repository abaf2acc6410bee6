//! The session state machine: Idle -> Running -> Completed | Failed.

use std::time::Instant;

use brief_common::SessionId;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, info_span, warn, Instrument};

use crate::event::Event;
use crate::framer::LineFramer;
use crate::parser::EventParser;
use crate::reader::{ChunkReader, ChunkStream};
use crate::reducer::{SessionState, SessionStatus};
use crate::{GenerationBackend, StreamError};

use super::options::PipelineOptions;

/// Drives one generation at a time and publishes its state.
///
/// `submit` and `run` take `&mut self`, so a controller can never have two
/// sessions in flight. Readers hold a [`watch::Receiver`] from
/// [`subscribe`](Self::subscribe) and only ever see fully reduced states.
pub struct SessionController {
    options: PipelineOptions,
    state_tx: watch::Sender<SessionState>,
}

impl SessionController {
    pub fn new(options: PipelineOptions) -> Self {
        let (state_tx, _) = watch::channel(SessionState::new(SessionId::new()));
        Self { options, state_tx }
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Receiver that observes every committed state.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state_tx.subscribe()
    }

    /// Clone of the current state.
    pub fn snapshot(&self) -> SessionState {
        self.state_tx.borrow().clone()
    }

    /// Submit `brief` to `backend` and ingest the reply until a terminal state.
    ///
    /// Failing to open the stream (refused connection, non-success status)
    /// ends the session as `Failed` just like a mid-stream failure.
    pub async fn submit(
        &mut self,
        backend: &dyn GenerationBackend,
        brief: &serde_json::Value,
        cancel: &CancellationToken,
    ) -> SessionStatus {
        let session = self.begin();
        let span = info_span!("session", id = %session.short());

        async {
            info!("submitting brief");
            let opened = tokio::select! {
                biased;
                _ = cancel.cancelled() => Err(StreamError::Cancelled),
                opened = backend.open_stream(brief) => opened,
            };
            match opened {
                Ok(chunks) => self.drive(ChunkReader::new(chunks, cancel.clone())).await,
                Err(e) => self.fail(e),
            }
        }
        .instrument(span)
        .await
    }

    /// Ingest an already-open chunk stream as a new session.
    pub async fn run(&mut self, chunks: ChunkStream, cancel: &CancellationToken) -> SessionStatus {
        let session = self.begin();
        let span = info_span!("session", id = %session.short());
        self.drive(ChunkReader::new(chunks, cancel.clone()))
            .instrument(span)
            .await
    }

    /// Replace the previous state wholesale with a fresh running one.
    fn begin(&mut self) -> SessionId {
        let session = SessionId::new();
        self.state_tx
            .send_replace(SessionState::running(session.clone()));
        session
    }

    async fn drive(&mut self, mut reader: ChunkReader) -> SessionStatus {
        let started = Instant::now();
        let mut framer = LineFramer::new();
        let mut parser = self.options.parser();

        loop {
            match reader.next_chunk().await {
                Ok(Some(chunk)) => {
                    for line in framer.push_chunk(&chunk) {
                        self.apply_line(&mut parser, &line);
                    }
                }
                Ok(None) => {
                    for line in framer.finish() {
                        self.apply_line(&mut parser, &line);
                    }
                    let (chunks, bytes) = reader.received();
                    info!(
                        chunks,
                        bytes,
                        dropped = parser.dropped(),
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "stream finished"
                    );
                    return self.settle(SessionStatus::Completed, None);
                }
                Err(e) => {
                    if !framer.pending().is_empty() {
                        debug!(len = framer.pending().len(), "discarding unterminated line");
                    }
                    return self.fail(e);
                }
            }
        }
    }

    fn apply_line(&self, parser: &mut EventParser, line: &str) {
        if let Some(event) = parser.parse(line) {
            debug!(kind = %event.kind(), "event");
            self.state_tx.send_modify(|state| state.apply(event));
        }
    }

    fn fail(&self, error: StreamError) -> SessionStatus {
        if error.is_cancelled() {
            info!("session cancelled");
        } else {
            warn!(error = %error, "session failed");
        }
        self.settle(SessionStatus::Failed, Some(error))
    }

    /// Terminal transition. The synthesized error event and `busy = false`
    /// land in the same commit.
    fn settle(&self, status: SessionStatus, error: Option<StreamError>) -> SessionStatus {
        self.state_tx.send_modify(|state| {
            if let Some(error) = error {
                state.apply(Event::Error {
                    error: error.to_string(),
                });
            }
            state.status = status;
            state.busy = false;
        });
        status
    }
}

impl Default for SessionController {
    fn default() -> Self {
        Self::new(PipelineOptions::default())
    }
}
