//! Cancellable chunk pulls over a response body.

use bytes::Bytes;
use futures_util::stream::{BoxStream, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::trace;

use crate::StreamError;

/// Raw response body as delivered by the transport.
pub type ChunkStream = BoxStream<'static, Result<Bytes, StreamError>>;

/// Adapt a reqwest response body into a [`ChunkStream`].
pub fn response_chunks(response: reqwest::Response) -> ChunkStream {
    response
        .bytes_stream()
        .map(|result| result.map_err(|e| StreamError::Transport(e.to_string())))
        .boxed()
}

/// Pulls chunks until the body ends, fails, or the token is cancelled.
///
/// Cancellation wins over an already-available chunk, so an abort is
/// observed at the very next pull.
pub struct ChunkReader {
    stream: ChunkStream,
    cancel: CancellationToken,
    chunks: u64,
    bytes: u64,
}

impl ChunkReader {
    pub fn new(stream: ChunkStream, cancel: CancellationToken) -> Self {
        Self {
            stream,
            cancel,
            chunks: 0,
            bytes: 0,
        }
    }

    /// `Ok(None)` means orderly end of stream.
    pub async fn next_chunk(&mut self) -> Result<Option<Bytes>, StreamError> {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(StreamError::Cancelled),
            next = self.stream.next() => match next {
                Some(Ok(chunk)) => {
                    self.chunks += 1;
                    self.bytes += chunk.len() as u64;
                    trace!(len = chunk.len(), "chunk received");
                    Ok(Some(chunk))
                }
                Some(Err(e)) => Err(e),
                None => Ok(None),
            },
        }
    }

    /// Chunks and bytes received so far.
    pub fn received(&self) -> (u64, u64) {
        (self.chunks, self.bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::stream;

    fn chunks(items: Vec<Result<&'static str, StreamError>>) -> ChunkStream {
        stream::iter(
            items
                .into_iter()
                .map(|item| item.map(|s| Bytes::from_static(s.as_bytes()))),
        )
        .boxed()
    }

    #[tokio::test]
    async fn yields_chunks_then_end() {
        let mut reader = ChunkReader::new(chunks(vec![Ok("ab"), Ok("c")]), CancellationToken::new());
        assert_eq!(reader.next_chunk().await.unwrap().unwrap(), "ab");
        assert_eq!(reader.next_chunk().await.unwrap().unwrap(), "c");
        assert_eq!(reader.next_chunk().await.unwrap(), None);
        assert_eq!(reader.received(), (2, 3));
    }

    #[tokio::test]
    async fn transport_error_propagates() {
        let mut reader = ChunkReader::new(
            chunks(vec![Ok("x"), Err(StreamError::Transport("reset".into()))]),
            CancellationToken::new(),
        );
        assert!(reader.next_chunk().await.is_ok());
        assert_eq!(
            reader.next_chunk().await,
            Err(StreamError::Transport("reset".into()))
        );
    }

    #[tokio::test]
    async fn cancellation_beats_ready_chunk() {
        let cancel = CancellationToken::new();
        let mut reader = ChunkReader::new(chunks(vec![Ok("ready")]), cancel.clone());
        cancel.cancel();
        assert_eq!(reader.next_chunk().await, Err(StreamError::Cancelled));
    }

    #[tokio::test]
    async fn cancellation_interrupts_pending_pull() {
        let cancel = CancellationToken::new();
        let mut reader = ChunkReader::new(
            stream::pending::<Result<Bytes, StreamError>>().boxed(),
            cancel.clone(),
        );

        let canceller = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            canceller.cancel();
        });

        assert_eq!(reader.next_chunk().await, Err(StreamError::Cancelled));
    }
}
