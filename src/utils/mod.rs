//! # Utility Functions and Types
//!
//! Shared helpers used across the converter. Currently this is the MPEG-2
//! CRC32 used when generating PSI tables:
//!
//! ```rust
//! use es2ts::utils::Crc32Mpeg2;
//!
//! let crc = Crc32Mpeg2::calculate(b"section bytes");
//! println!("CRC32: {:08x}", crc);
//! ```

/// CRC calculation implementations
pub mod crc;

pub use crc::Crc32Mpeg2;
