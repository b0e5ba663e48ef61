//! # Elementary Stream Layer
//!
//! Everything between raw input bytes and whole ES units:
//!
//! - [`ByteSource`]: buffered reader with peek support
//! - [`StartcodeScanner`]: finds `00 00 01` startcode prefixes
//! - [`EsUnitReader`]: groups bytes between startcodes into [`EsUnit`]s
//! - [`detect_video_type`]: classifies the stream as H.262 / H.264 / AVS

/// Stream-type classification from leading startcodes
pub mod detect;

/// Startcode prefix scanning
pub mod scanner;

/// Buffered byte input with lookahead
pub mod source;

/// ES unit construction
pub mod unit;

pub use detect::{detect_video_type, VideoType};
pub use scanner::{Scan, StartcodeScanner};
pub use source::ByteSource;
pub use unit::{EsUnit, EsUnitReader};
