//! # MPEG Transport Stream Layer
//!
//! Everything between a framed ES unit and the 188-byte packets on the
//! wire:
//!
//! - [`pes`]: wraps ES units into Packetized Elementary Stream packets
//! - [`psi`]: builds PAT and PMT sections with their CRC-32
//! - [`packetizer`]: fragments PES packets and sections into TS packets,
//!   tracking per-PID continuity counters
//! - [`types`]: TS header, table bodies and the shared constants
//!
//! ## Example
//!
//! ```rust
//! use es2ts::format::ts::{pack_unit, TsPacketizer, DEFAULT_VIDEO_PID};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> es2ts::Result<()> {
//! let mut packetizer = TsPacketizer::new(std::io::Cursor::new(Vec::new()));
//! let pes = pack_unit(&[0x00, 0x00, 0x01, 0xB3, 0x12, 0x34])?;
//! packetizer.write_pes(DEFAULT_VIDEO_PID, &pes).await?;
//! packetizer.flush().await?;
//! # Ok(())
//! # }
//! ```

/// TS packet generation with continuity and adaptation-field handling
pub mod packetizer;

/// PES packet handling
pub mod pes;

/// PSI (PAT/PMT) section assembly
pub mod psi;

/// Core TS types and constants
pub mod types;

pub use packetizer::TsPacketizer;
pub use pes::{pack_unit, PesHeader, PES_HEADER_SIZE};
pub use psi::{pat_section, pmt_section};
pub use types::{
    TsHeader, DEFAULT_PMT_PID, DEFAULT_VIDEO_PID, PID_NULL, PID_PAT, PROGRAM_NUMBER, PSI_VERSION,
    STREAM_ID_VIDEO, STREAM_TYPE_AVS, STREAM_TYPE_H262, STREAM_TYPE_H264, TRANSPORT_STREAM_ID,
    TS_PACKET_SIZE, TS_PAYLOAD_SIZE,
};
