//! Container-format implementations. The transport-stream layer is the
//! only format this crate emits.

/// MPEG-2 Transport Stream muxing
pub mod ts;
