//! Incremental UTF-8 decoding of response chunks.

use encoding_rs::{CoderResult, Decoder, UTF_8};
use tracing::debug;

/// Stateful UTF-8 decoder fed one chunk at a time.
///
/// A code point split across two chunks is held back until its remaining
/// bytes arrive. Invalid sequences become U+FFFD; decoding never fails.
pub struct FrameDecoder {
    inner: Decoder,
    replaced: bool,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self {
            inner: UTF_8.new_decoder_with_bom_removal(),
            replaced: false,
        }
    }

    /// Decode the next chunk, returning whatever text is complete so far.
    pub fn decode(&mut self, chunk: &[u8]) -> String {
        self.decode_into(chunk, false)
    }

    /// Flush a dangling partial sequence at end of stream.
    ///
    /// Leaves the decoder ready for a new stream.
    pub fn finish(&mut self) -> String {
        let tail = self.decode_into(&[], true);
        self.inner = UTF_8.new_decoder_with_bom_removal();
        tail
    }

    /// Whether any bytes have been replaced with U+FFFD.
    pub fn had_replacements(&self) -> bool {
        self.replaced
    }

    fn decode_into(&mut self, mut src: &[u8], last: bool) -> String {
        let capacity = self
            .inner
            .max_utf8_buffer_length(src.len())
            .unwrap_or(src.len().saturating_mul(3).saturating_add(4));
        let mut out = String::with_capacity(capacity);

        loop {
            let (result, read, replaced) = self.inner.decode_to_string(src, &mut out, last);
            if replaced && !self.replaced {
                debug!("undecodable bytes in stream, substituting U+FFFD");
            }
            self.replaced |= replaced;
            src = &src[read..];
            match result {
                CoderResult::InputEmpty => return out,
                CoderResult::OutputFull => {
                    out.reserve(src.len().saturating_mul(3).saturating_add(4));
                }
            }
        }
    }
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::new()
    }
}
