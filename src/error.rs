//! # Error Types
//!
//! Central error type for the converter. Every fallible operation in the
//! crate returns [`Result`], so callers deal with one taxonomy: I/O
//! failures, malformed elementary streams, an undecidable stream type, and
//! rejected configuration.

use thiserror::Error;

/// Primary error type for the es2ts library
#[derive(Error, Debug)]
pub enum Es2TsError {
    /// I/O errors from the input stream or the output sink
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The elementary stream could not be framed at startcode boundaries
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// Stream type detection failed and no type was forced
    #[error("unable to determine the video stream type")]
    UnknownStreamType,

    /// Rejected conversion parameters (reserved or colliding PIDs, zero caps)
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// A specialized Result type for es2ts operations.
///
/// ## Example
///
/// ```rust
/// use es2ts::error::{Es2TsError, Result};
///
/// fn check_payload(data: &[u8]) -> Result<()> {
///     if data.is_empty() {
///         return Err(Es2TsError::MalformedInput("empty payload".to_string()));
///     }
///     Ok(())
/// }
/// ```
pub type Result<T> = std::result::Result<T, Es2TsError>;
