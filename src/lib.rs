#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

//! # es2ts - Elementary Stream to Transport Stream Converter
//!
//! `es2ts` converts a raw MPEG video elementary stream (H.262, H.264 or
//! AVS) into a single-program MPEG-2 transport stream as defined by
//! ITU-T H.222.0 / ISO/IEC 13818-1. It is a stream copy: the video data
//! is reframed, never parsed beyond its startcodes, and no timestamps are
//! synthesized.
//!
//! ## Features
//!
//! - Codec family detection (H.262 / H.264 / AVS) from the leading
//!   startcodes, with a forced override for non-seekable input
//! - ES unit segmentation at `00 00 01` startcode boundaries
//! - PES encapsulation, one ES unit per PES packet
//! - 188-byte TS packetization with continuity counters and stuffing
//!   adaptation fields
//! - PAT and PMT generation with CRC-32/MPEG-2
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use es2ts::{Pipeline, TsConfig};
//!
//! #[tokio::main]
//! async fn main() -> es2ts::Result<()> {
//!     let input = tokio::fs::File::open("video.es").await?;
//!     let output = tokio::fs::File::create("video.ts").await?;
//!
//!     let pipeline = Pipeline::new(TsConfig::default())?;
//!     let stats = pipeline.run(input, output).await?;
//!
//!     println!("wrote {} TS packets", stats.ts_packets);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Overview
//!
//! - `es`: the elementary-stream side — byte sourcing, startcode
//!   scanning, unit building and codec detection
//! - `format`: the transport-stream side — PES packets, PSI tables and
//!   the TS packetizer
//! - `config`: conversion parameters and their validation
//! - `pipeline`: orchestration of one whole conversion
//! - `error`: the crate-wide error type
//! - `utils`: CRC-32/MPEG-2

/// Conversion parameters
pub mod config;

/// Error types and utilities
pub mod error;

/// Elementary-stream reading and segmentation
pub mod es;

/// Transport-stream packet and table generation
pub mod format;

/// Conversion orchestration
pub mod pipeline;

/// Common utilities
pub mod utils;

pub use config::TsConfig;
pub use error::{Es2TsError, Result};
pub use pipeline::{Pipeline, RunStats};
