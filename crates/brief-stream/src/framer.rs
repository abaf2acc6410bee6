//! Bytes-to-lines framing state, threaded through each chunk.

use crate::decoder::FrameDecoder;
use crate::splitter::LineSplitter;

/// Decoder state plus carry buffer for one response body.
///
/// Feeding the same bytes in any chunking yields the same lines.
#[derive(Default)]
pub struct LineFramer {
    decoder: FrameDecoder,
    splitter: LineSplitter,
}

impl LineFramer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one raw chunk; returns the lines it completed.
    pub fn push_chunk(&mut self, chunk: &[u8]) -> Vec<String> {
        let text = self.decoder.decode(chunk);
        self.splitter.push(&text)
    }

    /// Orderly end of stream: flush the decoder tail and the residual carry
    /// as a final line, since the producer's last message may lack a newline.
    pub fn finish(&mut self) -> Vec<String> {
        let tail = self.decoder.finish();
        let mut lines = self.splitter.push(&tail);
        lines.extend(self.splitter.finish());
        lines
    }

    /// Unterminated text currently held back.
    pub fn pending(&self) -> &str {
        self.splitter.carry()
    }

    pub fn had_replacements(&self) -> bool {
        self.decoder.had_replacements()
    }
}
