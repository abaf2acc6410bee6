//! Event-stream ingestion for design generation.
//!
//! Submits a design brief to the generation service and folds the streamed
//! reply into a render-ready [`SessionState`]:
//! - Chunk reading with cooperative cancellation
//! - Incremental UTF-8 decoding across chunk boundaries
//! - Line reassembly with a carry buffer
//! - Tolerant event parsing (malformed frames are dropped, not fatal)
//! - A pure reducer and a single-flight session controller

pub mod client;
pub mod decoder;
pub mod event;
pub mod framer;
pub mod parser;
pub mod reader;
pub mod reducer;
pub mod session;
pub mod splitter;

use async_trait::async_trait;

pub use client::{ClientConfig, GenerationClient};
pub use decoder::FrameDecoder;
pub use event::{Event, EventKind};
pub use framer::LineFramer;
pub use parser::{parse_line, EventParser, DEFAULT_MARKER};
pub use reader::{ChunkReader, ChunkStream};
pub use reducer::{reduce, replay, SessionState, SessionStatus};
pub use session::{PipelineOptions, SessionController};
pub use splitter::LineSplitter;

/// Anything that can turn a brief into a stream of raw response chunks.
///
/// [`GenerationClient`] is the HTTP implementation; tests drive the
/// controller with in-memory backends.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    async fn open_stream(&self, brief: &serde_json::Value) -> Result<ChunkStream, StreamError>;
}

/// Terminal failures of a generation session.
///
/// Decode problems and malformed frames never show up here; the pipeline
/// recovers from those locally.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StreamError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("generation cancelled")]
    Cancelled,
}

impl StreamError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
