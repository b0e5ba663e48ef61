//! PAT and PMT section assembly.
//!
//! Sections are produced complete, from `table_id` through the trailing
//! CRC-32, ready to be handed to the packetizer with a pointer field.

use super::types::{EsInfo, Pat, PatEntry, Pmt, TABLE_ID_PAT, TABLE_ID_PMT};
use crate::error::Result;
use crate::utils::Crc32Mpeg2;
use bytes::{BufMut, BytesMut};

/// Builds the complete PAT section declaring a single program.
pub fn pat_section(
    transport_stream_id: u16,
    program_number: u16,
    pmt_pid: u16,
) -> Result<BytesMut> {
    let pat = Pat {
        entries: vec![PatEntry {
            program_number,
            program_map_pid: pmt_pid,
        }],
    };
    let mut body = BytesMut::new();
    pat.write_to(&mut body)?;
    Ok(finish_section(TABLE_ID_PAT, transport_stream_id, 0, &body))
}

/// Builds the complete PMT section for one video elementary stream.
///
/// The video PID doubles as the PCR PID even though no PCR fields are
/// ever inserted; decoders tolerate the missing clock for a stream-copy
/// like this, though strict validators may warn.
pub fn pmt_section(
    program_number: u16,
    version: u8,
    stream_type: u8,
    video_pid: u16,
) -> Result<BytesMut> {
    let pmt = Pmt {
        pcr_pid: video_pid,
        streams: vec![EsInfo {
            stream_type,
            elementary_pid: video_pid,
        }],
    };
    let mut body = BytesMut::new();
    pmt.write_to(&mut body)?;
    Ok(finish_section(TABLE_ID_PMT, program_number, version, &body))
}

/// Frames a table body with the long-form section header and appends the
/// CRC-32 over everything from `table_id` onward.
fn finish_section(table_id: u8, table_id_extension: u16, version: u8, body: &[u8]) -> BytesMut {
    // section_length counts everything after its own field, CRC included.
    let section_length = 5 + body.len() + 4;
    let mut section = BytesMut::with_capacity(3 + section_length);
    section.put_u8(table_id);
    // section_syntax_indicator = 1, private = 0, reserved '11'
    section.put_u16(0xB000 | section_length as u16);
    section.put_u16(table_id_extension);
    // reserved '11', version, current_next = 1
    section.put_u8(0xC0 | ((version & 0x1F) << 1) | 0x01);
    section.put_u8(0x00); // section_number
    section.put_u8(0x00); // last_section_number
    section.extend_from_slice(body);

    let crc = Crc32Mpeg2::calculate(&section);
    section.put_u32(crc);
    section
}
