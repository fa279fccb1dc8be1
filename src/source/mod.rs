//! Frame sources.
//!
//! A source is a sequential, pull-based reader. It is consumed once; re-reading a video means
//! opening a new source.

/// `ffmpeg`-backed decoding of video files.
pub mod ffmpeg;
/// Sources backed by frames already in memory.
pub mod memory;

use crate::foundation::core::Fps;
use crate::foundation::error::AmbilightResult;
use crate::frame::buffer::Frame;

/// Static properties of a video, known before the first frame is read.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct VideoInfo {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Total frames, possibly estimated from duration when the container does not say.
    pub frame_count: u64,
    /// Nominal frame rate.
    pub fps: Fps,
}

/// Sequential reader of decoded RGB8 frames.
///
/// Frames are yielded with strictly increasing indices starting at 0. `Ok(None)` marks the end of
/// the stream; an `Err` is fatal for the run.
pub trait FrameSource: Send {
    /// Video properties.
    fn info(&self) -> &VideoInfo;
    /// Read the next frame, or `None` at end of stream.
    fn next_frame(&mut self) -> AmbilightResult<Option<Frame>>;
}
