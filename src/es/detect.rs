use super::source::ByteSource;
use crate::error::Result;
use crate::format::ts::{STREAM_TYPE_AVS, STREAM_TYPE_H262, STREAM_TYPE_H264};
use log::debug;
use std::fmt;
use tokio::io::AsyncRead;

/// How far into the stream the heuristics may look.
const DETECT_WINDOW: usize = 4096;
/// How many startcodes are enough to decide.
const DETECT_MAX_CODES: usize = 16;

/// Video codec families the converter can label in the PMT.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoType {
    /// MPEG-2 video (H.262), including MPEG-1 streams
    H262,
    /// MPEG-4/AVC video (H.264)
    H264,
    /// AVS video
    Avs,
    /// Not recognised as any supported family
    Unknown,
}

impl VideoType {
    /// The PMT `stream_type` byte for this family, if it has one.
    pub fn stream_type(self) -> Option<u8> {
        match self {
            VideoType::H262 => Some(STREAM_TYPE_H262),
            VideoType::H264 => Some(STREAM_TYPE_H264),
            VideoType::Avs => Some(STREAM_TYPE_AVS),
            VideoType::Unknown => None,
        }
    }
}

impl fmt::Display for VideoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VideoType::H262 => "MPEG-2 (H.262)",
            VideoType::H264 => "MPEG-4/AVC (H.264)",
            VideoType::Avs => "AVS",
            VideoType::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Classifies the stream by peeking at its leading startcodes.
///
/// Only peeks, nothing is consumed, so the same source can then be fed to
/// the unit reader from the first byte. Looks at most 4 KiB ahead and
/// decides on at most the first 16 startcodes.
pub async fn detect_video_type<R: AsyncRead + Unpin + Send>(
    source: &mut ByteSource<R>,
) -> Result<VideoType> {
    let window = source.peek(DETECT_WINDOW).await?;
    let codes = collect_startcodes(window);
    let video_type = classify(&codes);
    debug!(
        "classified input as {video_type} from {} startcode(s)",
        codes.len()
    );
    Ok(video_type)
}

/// Gathers the startcode identifier bytes present in `data`, in order.
fn collect_startcodes(data: &[u8]) -> Vec<u8> {
    let mut codes = Vec::new();
    let mut zeros = 0usize;
    let mut expect_code = false;
    for &byte in data {
        if expect_code {
            codes.push(byte);
            if codes.len() == DETECT_MAX_CODES {
                break;
            }
            expect_code = false;
            zeros = 0;
            continue;
        }
        match byte {
            0x00 => zeros += 1,
            0x01 if zeros >= 2 => {
                expect_code = true;
                zeros = 0;
            }
            _ => zeros = 0,
        }
    }
    codes
}

fn classify(codes: &[u8]) -> VideoType {
    let Some(&first) = codes.first() else {
        return VideoType::Unknown;
    };

    // Sequence-level codes are unambiguous: 0xB3 is the MPEG-2
    // sequence_header, 0xB0 the AVS video_sequence_start. A picture_start
    // as the very first code also marks H.262.
    match first {
        0xB0 => return VideoType::Avs,
        0xB3 => return VideoType::H262,
        0x00 => return VideoType::H262,
        _ => {}
    }
    for &code in codes {
        match code {
            0xB0 => return VideoType::Avs,
            0xB3 => return VideoType::H262,
            _ => {}
        }
    }

    // H.264 NAL headers keep the forbidden_zero_bit clear and their low
    // five bits within the NAL-type range; a real stream shows parameter
    // sets, delimiters or slices among its first units.
    let nal_like = codes
        .iter()
        .all(|&code| code & 0x80 == 0 && matches!(code & 0x1F, 1..=12));
    let prominent = codes
        .iter()
        .any(|&code| matches!(code & 0x1F, 1 | 5 | 7 | 8 | 9));
    if nal_like && prominent {
        return VideoType::H264;
    }

    VideoType::Unknown
}
