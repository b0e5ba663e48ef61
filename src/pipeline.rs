//! Pipeline orchestration: detection, PSI emission and the unit loop.

use crate::config::TsConfig;
use crate::error::{Es2TsError, Result};
use crate::es::{detect_video_type, ByteSource, EsUnitReader, VideoType};
use crate::format::ts::{
    pack_unit, pat_section, pmt_section, TsPacketizer, PID_PAT, PROGRAM_NUMBER, PSI_VERSION,
    TRANSPORT_STREAM_ID, TS_PACKET_SIZE,
};
use log::{debug, info};
use tokio::io::{AsyncRead, AsyncWrite};

/// Counters reported after a completed conversion.
#[derive(Debug, Default, Clone, Copy)]
pub struct RunStats {
    /// ES units read and converted
    pub units: u64,
    /// Complete TS packets emitted, PSI included
    pub ts_packets: u64,
    /// Output size in bytes (always `ts_packets * 188`)
    pub bytes_out: u64,
}

/// One-shot converter from an elementary stream to a transport stream.
///
/// Holds the validated configuration; [`run`](Pipeline::run) performs a
/// whole conversion against a reader/writer pair.
pub struct Pipeline {
    config: TsConfig,
}

impl Pipeline {
    /// Validates `config` and builds the pipeline.
    pub fn new(config: TsConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Converts the whole of `reader` into TS packets on `writer`.
    ///
    /// Emits PAT and PMT first, then one PES packet per ES unit until end
    /// of stream or the configured unit cap. The writer is flushed and
    /// shut down on success; on error the already-written packets are
    /// left as-is (a TS stream resynchronizes at every sync byte).
    pub async fn run<R, W>(&self, reader: R, writer: W) -> Result<RunStats>
    where
        R: AsyncRead + Unpin + Send,
        W: AsyncWrite + Unpin + Send,
    {
        let mut source = ByteSource::new(reader);

        let video_type = match self.config.stream_type {
            Some(forced) => {
                info!("reading input as {forced}");
                forced
            }
            None => {
                let detected = detect_video_type(&mut source).await?;
                if detected == VideoType::Unknown {
                    // Empty input still yields a valid PSI-only stream;
                    // only undecidable data is an error.
                    if !source.peek(1).await?.is_empty() {
                        return Err(Es2TsError::UnknownStreamType);
                    }
                    VideoType::H262
                } else {
                    info!("input appears to be {detected}");
                    detected
                }
            }
        };
        let stream_type = video_type
            .stream_type()
            .ok_or(Es2TsError::UnknownStreamType)?;

        info!(
            "using transport stream id {}, PMT PID {:#x}, program {} = PID {:#x}, stream type {:#x}",
            TRANSPORT_STREAM_ID, self.config.pmt_pid, PROGRAM_NUMBER, self.config.video_pid,
            stream_type
        );

        let mut packetizer = TsPacketizer::new(writer);
        let pat = pat_section(TRANSPORT_STREAM_ID, PROGRAM_NUMBER, self.config.pmt_pid)?;
        packetizer.write_section(PID_PAT, &pat).await?;
        let pmt = pmt_section(PROGRAM_NUMBER, PSI_VERSION, stream_type, self.config.video_pid)?;
        packetizer.write_section(self.config.pmt_pid, &pmt).await?;

        let mut units = EsUnitReader::new(source);
        let mut count: u64 = 0;
        let outcome = loop {
            match units.next_unit().await {
                Ok(Some(unit)) => {
                    debug!(
                        "ES unit at {:#x}: startcode {:#04x}, {} byte(s)",
                        unit.start_offset,
                        unit.startcode(),
                        unit.len()
                    );
                    let pes = pack_unit(&unit.data)?;
                    if let Err(err) = packetizer.write_pes(self.config.video_pid, &pes).await {
                        break Err(err);
                    }
                    count += 1;
                    if self.config.max_units.is_some_and(|max| count >= max) {
                        info!("stopping after {count} ES unit(s)");
                        break Ok(());
                    }
                }
                Ok(None) => break Ok(()),
                Err(err) => break Err(err),
            }
        };

        match outcome {
            Ok(()) => {
                packetizer.flush().await?;
                packetizer.shutdown().await?;
                info!("transferred {count} ES data unit(s)");
                let ts_packets = packetizer.packets_written();
                Ok(RunStats {
                    units: count,
                    ts_packets,
                    bytes_out: ts_packets * TS_PACKET_SIZE as u64,
                })
            }
            Err(err) => {
                // Whatever was fully packetized may still reach the sink.
                let _ = packetizer.flush().await;
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    async fn convert(input: &'static [u8], config: TsConfig) -> Result<Vec<u8>> {
        let pipeline = Pipeline::new(config)?;
        let mut sink = Cursor::new(Vec::new());
        pipeline.run(input, &mut sink).await?;
        Ok(sink.into_inner())
    }

    #[tokio::test]
    async fn test_empty_input_emits_psi_only() {
        let out = convert(&[], TsConfig::default()).await.unwrap();
        assert_eq!(out.len(), 2 * TS_PACKET_SIZE);
    }

    #[tokio::test]
    async fn test_unknown_input_without_force_fails() {
        let err = convert(&[0x12, 0x34, 0x56, 0x78], TsConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Es2TsError::UnknownStreamType));
    }

    #[tokio::test]
    async fn test_invalid_config_rejected_up_front() {
        assert!(Pipeline::new(TsConfig::default().with_video_pid(0)).is_err());
    }

    #[tokio::test]
    async fn test_stats_line_up_with_output() {
        let input: &[u8] = &[0x00, 0x00, 0x01, 0xB3, 0x01, 0x02, 0x00, 0x00, 0x01, 0x00, 0x03];
        let pipeline = Pipeline::new(TsConfig::default()).unwrap();
        let mut sink = Cursor::new(Vec::new());
        let stats = pipeline.run(input, &mut sink).await.unwrap();

        assert_eq!(stats.units, 2);
        assert_eq!(stats.bytes_out as usize, sink.get_ref().len());
        assert_eq!(stats.ts_packets, 4); // PAT, PMT, two video packets
    }
}
