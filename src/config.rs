use crate::error::{Es2TsError, Result};
use crate::es::VideoType;
use crate::format::ts::{DEFAULT_PMT_PID, DEFAULT_VIDEO_PID, PID_NULL, PID_PAT};

/// Conversion parameters for one pipeline run.
///
/// `Default` matches the classic tool defaults: video PID `0x68`, PMT PID
/// `0x66`, auto-detected stream type, no unit cap.
#[derive(Debug, Clone)]
pub struct TsConfig {
    /// PID carrying the video elementary stream
    pub video_pid: u16,
    /// PID carrying the Program Map Table
    pub pmt_pid: u16,
    /// Forced codec family; `None` asks the pipeline to auto-detect
    pub stream_type: Option<VideoType>,
    /// Stop after this many ES units; `None` converts the whole stream
    pub max_units: Option<u64>,
}

impl Default for TsConfig {
    fn default() -> Self {
        Self {
            video_pid: DEFAULT_VIDEO_PID,
            pmt_pid: DEFAULT_PMT_PID,
            stream_type: None,
            max_units: None,
        }
    }
}

impl TsConfig {
    /// Sets the video PID.
    pub fn with_video_pid(mut self, pid: u16) -> Self {
        self.video_pid = pid;
        self
    }

    /// Sets the PMT PID.
    pub fn with_pmt_pid(mut self, pid: u16) -> Self {
        self.pmt_pid = pid;
        self
    }

    /// Forces the stream type instead of auto-detecting it.
    pub fn with_stream_type(mut self, stream_type: VideoType) -> Self {
        self.stream_type = Some(stream_type);
        self
    }

    /// Caps the number of ES units converted.
    pub fn with_max_units(mut self, max: u64) -> Self {
        self.max_units = Some(max);
        self
    }

    /// Rejects reserved or colliding PIDs, a zero unit cap, and a forced
    /// unknown type.
    pub fn validate(&self) -> Result<()> {
        for (name, pid) in [("video", self.video_pid), ("PMT", self.pmt_pid)] {
            if pid == PID_PAT || pid >= PID_NULL {
                return Err(Es2TsError::InvalidConfig(format!(
                    "{name} PID {pid:#06x} is reserved or out of range"
                )));
            }
        }
        if self.video_pid == self.pmt_pid {
            return Err(Es2TsError::InvalidConfig(format!(
                "video and PMT PIDs must differ (both are {:#06x})",
                self.video_pid
            )));
        }
        if self.max_units == Some(0) {
            return Err(Es2TsError::InvalidConfig(
                "maximum unit count must be positive".to_string(),
            ));
        }
        if self.stream_type == Some(VideoType::Unknown) {
            return Err(Es2TsError::InvalidConfig(
                "cannot force the unknown stream type".to_string(),
            ));
        }
        Ok(())
    }
}
