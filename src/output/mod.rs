//! Output sinks.
//!
//! The LED sequence is written as JSON records; the optional preview stream receives resized frames
//! in frame order.

/// JSON (optionally gzip-compressed) LED sequence files.
pub mod json;
/// Preview frame sinks.
pub mod preview;
