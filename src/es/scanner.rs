use super::source::ByteSource;
use crate::error::Result;
use bytes::{BufMut, BytesMut};
use tokio::io::AsyncRead;

/// Outcome of one startcode search.
#[derive(Debug)]
pub enum Scan {
    /// A `00 00 01` prefix was found. `before` holds the bytes consumed
    /// ahead of the prefix, `code` the startcode byte that follows it.
    Found {
        /// Bytes consumed before the prefix (previous unit's tail).
        before: BytesMut,
        /// The startcode identifier byte.
        code: u8,
    },
    /// End of stream. `tail` holds whatever was consumed since the last
    /// find, including any truncated prefix bytes.
    Eof {
        /// Trailing bytes with no startcode after them.
        tail: BytesMut,
    },
}

/// Locates MPEG startcode prefixes (`00 00 01`) in an elementary stream.
///
/// The MPEG convention allows any number of zero bytes ahead of the `01`;
/// only the final two zeros plus the `01` form the prefix, so surplus
/// zeros are handed back in `before` as payload of the preceding unit.
pub struct StartcodeScanner<R> {
    source: ByteSource<R>,
}

impl<R: AsyncRead + Unpin + Send> StartcodeScanner<R> {
    /// Wraps a byte source for scanning.
    pub fn new(source: ByteSource<R>) -> Self {
        Self { source }
    }

    /// Byte offset of the next unconsumed byte.
    pub fn offset(&self) -> u64 {
        self.source.offset()
    }

    /// Consumes bytes up to and including the next startcode prefix and
    /// its identifier byte.
    pub async fn next_startcode(&mut self) -> Result<Scan> {
        let mut before = BytesMut::new();
        let mut zeros = 0usize;
        loop {
            let Some(byte) = self.source.read_byte().await? else {
                return Ok(Scan::Eof { tail: before });
            };
            match byte {
                0x00 => {
                    zeros += 1;
                    before.put_u8(0x00);
                }
                0x01 if zeros >= 2 => {
                    before.truncate(before.len() - 2);
                    match self.source.read_byte().await? {
                        Some(code) => return Ok(Scan::Found { before, code }),
                        None => {
                            // Prefix with no identifier byte: trailing data.
                            before.extend_from_slice(&[0x00, 0x00, 0x01]);
                            return Ok(Scan::Eof { tail: before });
                        }
                    }
                }
                other => {
                    zeros = 0;
                    before.put_u8(other);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn scan_all(data: &'static [u8]) -> Vec<Scan> {
        let mut scanner = StartcodeScanner::new(ByteSource::new(data));
        let mut results = Vec::new();
        loop {
            let scan = scanner.next_startcode().await.unwrap();
            let done = matches!(scan, Scan::Eof { .. });
            results.push(scan);
            if done {
                break;
            }
        }
        results
    }

    #[tokio::test]
    async fn test_finds_startcode_with_leading_garbage() {
        let results = scan_all(&[0xDE, 0xAD, 0x00, 0x00, 0x01, 0xB3, 0x55]).await;
        match &results[0] {
            Scan::Found { before, code } => {
                assert_eq!(&before[..], &[0xDE, 0xAD]);
                assert_eq!(*code, 0xB3);
            }
            other => panic!("expected Found, got {other:?}"),
        }
        match &results[1] {
            Scan::Eof { tail } => assert_eq!(&tail[..], &[0x55]),
            other => panic!("expected Eof, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_long_zero_run_keeps_surplus_zeros_in_before() {
        // 00 00 00 00 01: the prefix is the last two zeros plus the 01,
        // the first two zeros belong to the preceding data.
        let results = scan_all(&[0x00, 0x00, 0x00, 0x00, 0x01, 0x42]).await;
        match &results[0] {
            Scan::Found { before, code } => {
                assert_eq!(&before[..], &[0x00, 0x00]);
                assert_eq!(*code, 0x42);
            }
            other => panic!("expected Found, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_truncated_prefix_at_eof_returned_as_tail() {
        let results = scan_all(&[0x00, 0x00, 0x01, 0xB3, 0x00, 0x00, 0x01]).await;
        assert!(matches!(&results[0], Scan::Found { code: 0xB3, .. }));
        match &results[1] {
            Scan::Eof { tail } => assert_eq!(&tail[..], &[0x00, 0x00, 0x01]),
            other => panic!("expected Eof, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_no_startcode_at_all() {
        let results = scan_all(&[0x11, 0x22, 0x33]).await;
        match &results[0] {
            Scan::Eof { tail } => assert_eq!(&tail[..], &[0x11, 0x22, 0x33]),
            other => panic!("expected Eof, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_lone_zero_does_not_start_a_prefix() {
        // 00 01 is not a startcode prefix; at least two zeros are required.
        let results = scan_all(&[0x00, 0x01, 0x42, 0x00, 0x00, 0x01, 0x07]).await;
        match &results[0] {
            Scan::Found { before, code } => {
                assert_eq!(&before[..], &[0x00, 0x01, 0x42]);
                assert_eq!(*code, 0x07);
            }
            other => panic!("expected Found, got {other:?}"),
        }
    }
}
