use super::types::STREAM_ID_VIDEO;
use crate::error::Result;
use bytes::{BufMut, BytesMut};
use log::warn;

/// Byte count of the fixed PES header this converter emits: startcode
/// prefix, stream ID, length word, two flags bytes and the header-data
/// length byte.
pub const PES_HEADER_SIZE: usize = 9;

/// Packetized Elementary Stream header for a stream-copy packet.
///
/// This converter never carries timestamps: the flags bytes are fixed at
/// `0x80 0x00` (marker bits set, no scrambling, no PTS/DTS, no
/// extensions) and the header data length is zero.
#[derive(Debug, Clone)]
pub struct PesHeader {
    /// Stream identifier (`0xE0` for the video stream)
    pub stream_id: u8,
    /// `PES_packet_length`: bytes following the length field, or 0 for
    /// "unbounded" when the payload is too large for 16 bits
    pub packet_length: u16,
}

impl PesHeader {
    /// Builds the header for a payload of `payload_len` bytes.
    ///
    /// The length field covers the two flags bytes, the header-data
    /// length byte and the payload. When that sum exceeds 65535 the field
    /// is written as 0, H.222.0's "unbounded" marker. The standard allows
    /// the unbounded form only for video elementary streams, which is the
    /// only stream kind this converter produces (`stream_id` stays
    /// `0xE0`).
    ///
    /// # Arguments
    ///
    /// * `stream_id` - The stream_id byte for this PES packet
    /// * `payload_len` - Length in bytes of the payload the packet will
    ///   carry
    ///
    /// # Returns
    ///
    /// A header whose length field is filled in, or zeroed for the
    /// unbounded case
    pub fn for_payload(stream_id: u8, payload_len: usize) -> Self {
        let total = payload_len + 3;
        let packet_length = if total > usize::from(u16::MAX) {
            warn!(
                "PES payload of {payload_len} byte(s) exceeds the 16-bit length field, \
                 writing the packet as unbounded"
            );
            0
        } else {
            total as u16
        };
        Self {
            stream_id,
            packet_length,
        }
    }

    /// Appends the 9 header bytes to `buf`.
    ///
    /// # Arguments
    ///
    /// * `buf` - The buffer to write the header to
    ///
    /// # Returns
    ///
    /// `Ok(())` if writing is successful, `Err` otherwise
    pub fn write_to(&self, buf: &mut BytesMut) -> Result<()> {
        buf.extend_from_slice(&[0x00, 0x00, 0x01]);
        buf.put_u8(self.stream_id);
        buf.put_u16(self.packet_length);
        buf.put_u8(0x80); // '10' marker bits, nothing scrambled
        buf.put_u8(0x00); // no PTS, no DTS, no extensions
        buf.put_u8(0x00); // PES_header_data_length
        Ok(())
    }
}

/// Wraps one ES unit into a complete PES packet: header plus payload.
///
/// # Arguments
///
/// * `payload` - The ES unit bytes to carry, startcode included
///
/// # Returns
///
/// The contiguous PES packet bytes, ready for TS fragmentation
pub fn pack_unit(payload: &[u8]) -> Result<BytesMut> {
    let header = PesHeader::for_payload(STREAM_ID_VIDEO, payload.len());
    let mut buf = BytesMut::with_capacity(PES_HEADER_SIZE + payload.len());
    header.write_to(&mut buf)?;
    buf.extend_from_slice(payload);
    Ok(buf)
}
