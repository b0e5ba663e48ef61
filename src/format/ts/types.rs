use crate::error::Result;
use bytes::{BufMut, BytesMut};

// Stream IDs
/// PES stream ID used for the single video stream
pub const STREAM_ID_VIDEO: u8 = 0xE0;

// PIDs
/// PID for the Program Association Table (PAT)
pub const PID_PAT: u16 = 0x0000;
/// Null-packet PID; also the upper bound of the 13-bit PID space
pub const PID_NULL: u16 = 0x1FFF;
/// Default PID for the Program Map Table (PMT)
pub const DEFAULT_PMT_PID: u16 = 0x66;
/// Default PID for the video stream
pub const DEFAULT_VIDEO_PID: u16 = 0x68;

// Table IDs
/// Table ID for the Program Association Table (PAT)
pub const TABLE_ID_PAT: u8 = 0x00;
/// Table ID for the Program Map Table (PMT)
pub const TABLE_ID_PMT: u8 = 0x02;

// Elementary stream types
/// PMT stream_type for MPEG-2 (H.262) video
pub const STREAM_TYPE_H262: u8 = 0x02;
/// PMT stream_type for MPEG-4/AVC (H.264) video
pub const STREAM_TYPE_H264: u8 = 0x1B;
/// PMT stream_type for AVS video
pub const STREAM_TYPE_AVS: u8 = 0x42;

// Program constants
/// Transport stream ID written into the PAT
pub const TRANSPORT_STREAM_ID: u16 = 1;
/// The single program number declared in PAT and PMT
pub const PROGRAM_NUMBER: u16 = 1;
/// Version number of the emitted PSI tables
pub const PSI_VERSION: u8 = 0;

// Sizes
/// Size of a Transport Stream packet in bytes
pub const TS_PACKET_SIZE: usize = 188;
/// Size of the fixed Transport Stream header in bytes
pub const TS_HEADER_SIZE: usize = 4;
/// Payload capacity of a TS packet without an adaptation field
pub const TS_PAYLOAD_SIZE: usize = TS_PACKET_SIZE - TS_HEADER_SIZE;

/// The fixed 4-byte header of a Transport Stream packet.
///
/// Every TS packet starts with this header; it identifies the logical
/// channel (PID), marks payload-unit boundaries, and carries the
/// continuity counter used by receivers to detect packet loss.
#[derive(Debug)]
pub struct TsHeader {
    /// Transport error indicator; never set by the packetizer
    pub transport_error: bool,
    /// Payload unit start indicator: first TS packet of a PES packet or
    /// PSI section
    pub payload_unit_start: bool,
    /// Transport priority; never set by the packetizer
    pub transport_priority: bool,
    /// Packet identifier (13 bits)
    pub pid: u16,
    /// Scrambling control (2 bits); always 0, nothing is scrambled
    pub scrambling_control: u8,
    /// Whether an adaptation field follows the header
    pub adaptation_field: bool,
    /// Whether payload bytes are present
    pub contains_payload: bool,
    /// Continuity counter (4 bits)
    pub continuity_counter: u8,
}

impl Default for TsHeader {
    fn default() -> Self {
        Self {
            transport_error: false,
            payload_unit_start: false,
            transport_priority: false,
            pid: 0,
            scrambling_control: 0,
            adaptation_field: false,
            contains_payload: true,
            continuity_counter: 0,
        }
    }
}

impl TsHeader {
    /// Packs the header fields into their bit positions and appends the
    /// four bytes to `buf`. The sync byte `0x47` is written first.
    ///
    /// # Arguments
    ///
    /// * `buf` - The buffer to write the header to
    ///
    /// # Returns
    ///
    /// `Ok(())` if writing is successful, `Err` otherwise
    pub fn write_to(&self, buf: &mut BytesMut) -> Result<()> {
        buf.put_u8(0x47);

        let mut b1 = 0u8;
        if self.transport_error {
            b1 |= 0x80;
        }
        if self.payload_unit_start {
            b1 |= 0x40;
        }
        if self.transport_priority {
            b1 |= 0x20;
        }
        b1 |= ((self.pid >> 8) & 0x1F) as u8;
        buf.put_u8(b1);

        buf.put_u8((self.pid & 0xFF) as u8);

        let mut b3 = self.scrambling_control << 6;
        if self.adaptation_field {
            b3 |= 0x20;
        }
        if self.contains_payload {
            b3 |= 0x10;
        }
        b3 |= self.continuity_counter & 0x0F;
        buf.put_u8(b3);

        Ok(())
    }
}

/// One entry of the Program Association Table: a program number mapped to
/// its PMT PID.
#[derive(Debug, Clone)]
pub struct PatEntry {
    /// Program number (0 is reserved for the network PID)
    pub program_number: u16,
    /// PID of the Program Map Table for this program
    pub program_map_pid: u16,
}

/// Program Association Table body: the program loop that follows the
/// section header.
///
/// The PAT is carried on PID `0x0000` and maps each program number to
/// the PID of its Program Map Table; it is the entry point a demuxer
/// uses to find everything else in the stream.
#[derive(Debug, Clone, Default)]
pub struct Pat {
    /// Program entries, one per program
    pub entries: Vec<PatEntry>,
}

impl Pat {
    /// Writes the program loop. Each entry is the 16-bit program number
    /// followed by the 13-bit PMT PID under three reserved `1` bits.
    ///
    /// # Arguments
    ///
    /// * `buf` - The buffer to write the program loop to
    ///
    /// # Returns
    ///
    /// `Ok(())` if writing is successful, `Err` otherwise
    pub fn write_to(&self, buf: &mut BytesMut) -> Result<()> {
        for entry in &self.entries {
            buf.put_u16(entry.program_number);
            buf.put_u16(entry.program_map_pid & 0x1FFF | 7 << 13);
        }
        Ok(())
    }
}

/// One elementary-stream entry of the Program Map Table.
#[derive(Debug, Clone)]
pub struct EsInfo {
    /// Encoding of the elementary stream (e.g. `STREAM_TYPE_H264`)
    pub stream_type: u8,
    /// PID carrying the elementary stream
    pub elementary_pid: u16,
}

/// Program Map Table body: PCR PID, program info and the elementary
/// stream loop.
///
/// The PMT describes one program: which PID carries its clock reference
/// and which elementary streams (with their encodings) make it up.
#[derive(Debug, Clone, Default)]
pub struct Pmt {
    /// PID carrying the Program Clock Reference
    pub pcr_pid: u16,
    /// The program's elementary streams
    pub streams: Vec<EsInfo>,
}

impl Pmt {
    /// Writes the PMT body. No program descriptors and no ES descriptors
    /// are emitted, so both length fields are zero.
    ///
    /// # Arguments
    ///
    /// * `buf` - The buffer to write the table body to
    ///
    /// # Returns
    ///
    /// `Ok(())` if writing is successful, `Err` otherwise
    pub fn write_to(&self, buf: &mut BytesMut) -> Result<()> {
        buf.put_u16(self.pcr_pid & 0x1FFF | 7 << 13);
        buf.put_u16(0xF << 12); // program_info_length = 0

        for info in &self.streams {
            buf.put_u8(info.stream_type);
            buf.put_u16(info.elementary_pid & 0x1FFF | 7 << 13);
            buf.put_u16(0xF << 12); // ES_info_length = 0
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ts_header_bit_layout() {
        let header = TsHeader {
            payload_unit_start: true,
            pid: 0x1ABC,
            adaptation_field: true,
            continuity_counter: 0x0D,
            ..Default::default()
        };
        let mut buf = BytesMut::new();
        header.write_to(&mut buf).unwrap();

        assert_eq!(buf.len(), TS_HEADER_SIZE);
        assert_eq!(buf[0], 0x47);
        assert_eq!(buf[1], 0x40 | 0x1A);
        assert_eq!(buf[2], 0xBC);
        assert_eq!(buf[3], 0x30 | 0x0D);
    }

    #[test]
    fn test_pat_body() {
        let pat = Pat {
            entries: vec![PatEntry {
                program_number: 1,
                program_map_pid: 0x66,
            }],
        };
        let mut buf = BytesMut::new();
        pat.write_to(&mut buf).unwrap();
        assert_eq!(&buf[..], &[0x00, 0x01, 0xE0, 0x66]);
    }

    #[test]
    fn test_pmt_body() {
        let pmt = Pmt {
            pcr_pid: 0x68,
            streams: vec![EsInfo {
                stream_type: STREAM_TYPE_H264,
                elementary_pid: 0x68,
            }],
        };
        let mut buf = BytesMut::new();
        pmt.write_to(&mut buf).unwrap();
        assert_eq!(
            &buf[..],
            &[0xE0, 0x68, 0xF0, 0x00, 0x1B, 0xE0, 0x68, 0xF0, 0x00]
        );
    }
}
