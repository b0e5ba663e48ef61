use crate::error::Result;
use bytes::{Buf, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt};

/// Refill granularity for the lookahead buffer. Also the upper bound the
/// stream-type heuristics may peek without consuming.
const READ_CHUNK: usize = 4096;

/// Buffered forward-only reader over an elementary stream.
///
/// Wraps any [`AsyncRead`] and adds the lookahead that startcode scanning
/// and stream-type detection need: [`peek`](ByteSource::peek) exposes
/// upcoming bytes without consuming them, while
/// [`read_byte`](ByteSource::read_byte) advances the stream one byte at a
/// time.
pub struct ByteSource<R> {
    reader: R,
    lookahead: BytesMut,
    offset: u64,
    eof: bool,
}

impl<R: AsyncRead + Unpin + Send> ByteSource<R> {
    /// Creates a source over `reader` with an empty lookahead buffer.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            lookahead: BytesMut::with_capacity(READ_CHUNK),
            offset: 0,
            eof: false,
        }
    }

    /// Byte offset of the next unconsumed byte within the input stream.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    async fn fill(&mut self, wanted: usize) -> Result<()> {
        while self.lookahead.len() < wanted && !self.eof {
            self.lookahead.reserve(READ_CHUNK);
            let n = self.reader.read_buf(&mut self.lookahead).await?;
            if n == 0 {
                self.eof = true;
            }
        }
        Ok(())
    }

    /// Returns up to `n` upcoming bytes without consuming them.
    ///
    /// Fewer than `n` bytes are returned only when the stream ends first.
    pub async fn peek(&mut self, n: usize) -> Result<&[u8]> {
        self.fill(n).await?;
        let available = self.lookahead.len().min(n);
        Ok(&self.lookahead[..available])
    }

    /// Consumes and returns the next byte, or `None` at end of stream.
    pub async fn read_byte(&mut self) -> Result<Option<u8>> {
        self.fill(1).await?;
        if self.lookahead.is_empty() {
            return Ok(None);
        }
        self.offset += 1;
        Ok(Some(self.lookahead.get_u8()))
    }
}
