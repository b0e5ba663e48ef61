use super::types::{TsHeader, TS_PACKET_SIZE, TS_PAYLOAD_SIZE};
use crate::error::Result;
use bytes::{BufMut, BytesMut};
use std::collections::HashMap;
use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter};

/// Fragments PES packets and PSI sections into 188-byte TS packets.
///
/// Owns the per-PID continuity counters and the buffered output writer.
/// Every packet is staged in full before being written, so the sink never
/// sees a partial TS packet even when a write fails midway through a
/// stream.
pub struct TsPacketizer<W: AsyncWrite + Unpin + Send> {
    writer: BufWriter<W>,
    continuity: HashMap<u16, u8>,
    packets_written: u64,
}

impl<W: AsyncWrite + Unpin + Send> TsPacketizer<W> {
    /// Creates a packetizer writing to `writer`. All continuity counters
    /// start at zero.
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::new(writer),
            continuity: HashMap::new(),
            packets_written: 0,
        }
    }

    /// Number of complete TS packets committed to the writer.
    pub fn packets_written(&self) -> u64 {
        self.packets_written
    }

    /// Current counter value for `pid`; advances it modulo 16.
    fn next_continuity(&mut self, pid: u16) -> u8 {
        let counter = self.continuity.entry(pid).or_insert(0);
        let current = *counter;
        *counter = (*counter + 1) & 0x0F;
        current
    }

    /// Writes a PSI section as a single TS packet.
    ///
    /// The payload starts with a zero pointer field, then the section;
    /// the rest of the packet is `0xFF` section stuffing. Sections up to
    /// 183 bytes fit; PAT and PMT here are far below that.
    pub async fn write_section(&mut self, pid: u16, section: &[u8]) -> Result<()> {
        debug_assert!(section.len() <= TS_PAYLOAD_SIZE - 1);

        let mut packet = BytesMut::with_capacity(TS_PACKET_SIZE);
        let header = TsHeader {
            payload_unit_start: true,
            pid,
            continuity_counter: self.next_continuity(pid),
            ..Default::default()
        };
        header.write_to(&mut packet)?;
        packet.put_u8(0x00); // pointer_field
        packet.extend_from_slice(section);
        packet.resize(TS_PACKET_SIZE, 0xFF);

        self.commit(&packet).await
    }

    /// Fragments one complete PES packet across as many TS packets as
    /// needed on `pid`, with the payload-unit-start flag on the first
    /// packet only.
    pub async fn write_pes(&mut self, pid: u16, pes: &[u8]) -> Result<()> {
        let mut offset = 0;
        let mut first = true;
        while offset < pes.len() {
            let remaining = pes.len() - offset;
            let payload_len = remaining.min(TS_PAYLOAD_SIZE);

            let mut packet = BytesMut::with_capacity(TS_PACKET_SIZE);
            let header = TsHeader {
                payload_unit_start: first,
                pid,
                adaptation_field: remaining < TS_PAYLOAD_SIZE,
                continuity_counter: self.next_continuity(pid),
                ..Default::default()
            };
            header.write_to(&mut packet)?;
            if remaining < TS_PAYLOAD_SIZE {
                write_stuffing(&mut packet, TS_PAYLOAD_SIZE - remaining);
            }
            packet.extend_from_slice(&pes[offset..offset + payload_len]);

            self.commit(&packet).await?;
            offset += payload_len;
            first = false;
        }
        Ok(())
    }

    async fn commit(&mut self, packet: &[u8]) -> Result<()> {
        debug_assert_eq!(packet.len(), TS_PACKET_SIZE);
        self.writer.write_all(packet).await?;
        self.packets_written += 1;
        Ok(())
    }

    /// Flushes buffered packets through to the underlying writer.
    pub async fn flush(&mut self) -> Result<()> {
        self.writer.flush().await?;
        Ok(())
    }

    /// Flushes and shuts down the underlying writer.
    pub async fn shutdown(&mut self) -> Result<()> {
        self.writer.shutdown().await?;
        Ok(())
    }
}

/// Writes a stuffing-only adaptation field occupying `size` bytes ahead
/// of the payload.
///
/// The length byte counts the bytes after itself, so `size == 1` is the
/// single byte `0x00`; larger fields carry a zero flags byte followed by
/// `0xFF` stuffing.
fn write_stuffing(packet: &mut BytesMut, size: usize) {
    packet.put_u8((size - 1) as u8);
    if size > 1 {
        packet.put_u8(0x00);
        for _ in 0..size - 2 {
            packet.put_u8(0xFF);
        }
    }
}
