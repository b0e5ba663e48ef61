use super::scanner::{Scan, StartcodeScanner};
use super::source::ByteSource;
use crate::error::{Es2TsError, Result};
use bytes::{Bytes, BytesMut};
use log::warn;
use tokio::io::AsyncRead;

/// One elementary-stream unit: a startcode plus everything up to (but not
/// including) the next startcode prefix or end of stream.
#[derive(Debug, Clone)]
pub struct EsUnit {
    /// Unit bytes, always beginning `00 00 01 <code>`.
    pub data: Bytes,
    /// Byte offset of the startcode prefix within the input stream.
    pub start_offset: u64,
}

impl EsUnit {
    /// The startcode identifier byte of this unit.
    pub fn startcode(&self) -> u8 {
        self.data[3]
    }

    /// Total unit length in bytes (at least 4).
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always false; a unit carries at least its startcode.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Stateful producer of whole [`EsUnit`]s from a byte source.
///
/// The first call locates the first startcode, logging a lost-sync warning
/// if leading bytes had to be discarded. Input that contains data but no
/// startcode anywhere fails with
/// [`MalformedInput`](crate::error::Es2TsError::MalformedInput).
pub struct EsUnitReader<R> {
    scanner: StartcodeScanner<R>,
    pending: Option<(u8, u64)>,
    started: bool,
}

impl<R: AsyncRead + Unpin + Send> EsUnitReader<R> {
    /// Creates a reader over `source`.
    pub fn new(source: ByteSource<R>) -> Self {
        Self {
            scanner: StartcodeScanner::new(source),
            pending: None,
            started: false,
        }
    }

    /// Builds the next complete ES unit, or returns `None` at end of
    /// stream.
    pub async fn next_unit(&mut self) -> Result<Option<EsUnit>> {
        if !self.started {
            self.started = true;
            match self.scanner.next_startcode().await? {
                Scan::Found { before, code } => {
                    if !before.is_empty() {
                        warn!(
                            "skipped {} byte(s) before the first startcode",
                            before.len()
                        );
                    }
                    self.pending = Some((code, self.scanner.offset() - 4));
                }
                Scan::Eof { tail } => {
                    if tail.is_empty() {
                        return Ok(None);
                    }
                    return Err(Es2TsError::MalformedInput(format!(
                        "no startcode found in {} byte(s) of input",
                        tail.len()
                    )));
                }
            }
        }

        let Some((code, start_offset)) = self.pending.take() else {
            return Ok(None);
        };

        let mut data = BytesMut::with_capacity(64);
        data.extend_from_slice(&[0x00, 0x00, 0x01, code]);
        match self.scanner.next_startcode().await? {
            Scan::Found { before, code } => {
                data.extend_from_slice(&before);
                self.pending = Some((code, self.scanner.offset() - 4));
            }
            Scan::Eof { tail } => {
                data.extend_from_slice(&tail);
            }
        }

        Ok(Some(EsUnit {
            data: data.freeze(),
            start_offset,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn read_all(data: &'static [u8]) -> Vec<EsUnit> {
        let mut reader = EsUnitReader::new(ByteSource::new(data));
        let mut units = Vec::new();
        while let Some(unit) = reader.next_unit().await.unwrap() {
            units.push(unit);
        }
        units
    }

    #[tokio::test]
    async fn test_two_units() {
        let units = read_all(&[
            0x00, 0x00, 0x01, 0xB3, 0xAA, 0xBB, 0x00, 0x00, 0x01, 0x00, 0xCC,
        ])
        .await;
        assert_eq!(units.len(), 2);
        assert_eq!(&units[0].data[..], &[0x00, 0x00, 0x01, 0xB3, 0xAA, 0xBB]);
        assert_eq!(units[0].start_offset, 0);
        assert_eq!(units[0].startcode(), 0xB3);
        assert_eq!(&units[1].data[..], &[0x00, 0x00, 0x01, 0x00, 0xCC]);
        assert_eq!(units[1].start_offset, 6);
    }

    #[tokio::test]
    async fn test_bare_startcode_yields_four_byte_unit() {
        let units = read_all(&[0x00, 0x00, 0x01, 0xB3]).await;
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].len(), 4);
    }

    #[tokio::test]
    async fn test_leading_garbage_is_discarded() {
        let units = read_all(&[0xFF, 0xFE, 0x00, 0x00, 0x01, 0xB3, 0x01]).await;
        assert_eq!(units.len(), 1);
        assert_eq!(&units[0].data[..], &[0x00, 0x00, 0x01, 0xB3, 0x01]);
        assert_eq!(units[0].start_offset, 2);
    }

    #[tokio::test]
    async fn test_surplus_zeros_stay_with_previous_unit() {
        // A four-zero run: the first two zeros are payload of the first
        // unit, the rest is the next unit's prefix.
        let units = read_all(&[
            0x00, 0x00, 0x01, 0xB3, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00,
        ])
        .await;
        assert_eq!(units.len(), 2);
        assert_eq!(&units[0].data[..], &[0x00, 0x00, 0x01, 0xB3, 0x00, 0x00]);
        assert_eq!(&units[1].data[..], &[0x00, 0x00, 0x01, 0x00]);
    }

    #[tokio::test]
    async fn test_empty_input_is_clean_eof() {
        let data: &[u8] = &[];
        let mut reader = EsUnitReader::new(ByteSource::new(data));
        assert!(reader.next_unit().await.unwrap().is_none());
        // Subsequent calls stay at EOF.
        assert!(reader.next_unit().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_no_startcode_is_malformed() {
        let mut reader = EsUnitReader::new(ByteSource::new(&[0x10u8, 0x20, 0x30][..]));
        let err = reader.next_unit().await.unwrap_err();
        assert!(matches!(err, Es2TsError::MalformedInput(_)));
    }
}
