//! Ambilight turns a video into a time-ordered sequence of LED colors sampled from one frame edge.
//!
//! The pipeline:
//!
//! - Read frames from a [`FrameSource`] and group the selected ones into batches
//! - Extract one edge per frame on a worker pool ([`FrameExtractor`]): area-averaging resize,
//!   edge sampling, tone map, brightness clamp, saturation boost
//! - Reassemble the results in frame order ([`ResultAssembler`])
//! - Smooth them over time ([`TemporalSmoother`])
//! - Write them as JSON ([`write_output`]), optionally streaming resized frames to a
//!   [`PreviewSink`]
//!
//! [`run_pipeline`] drives all of it.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod color;
mod extract;
mod foundation;
mod frame;
pub(crate) mod pipeline;

/// Output sinks: LED sequence files and preview streams.
pub mod output;
/// Frame sources.
pub mod source;

pub use crate::foundation::core::{Fps, FrameIndex};
pub use crate::foundation::error::{AmbilightError, AmbilightResult};

pub use crate::color::format::{ColorFormat, Pixel, expand_rgb};
pub use crate::color::hsv::{hsv_to_rgb, rgb_to_hsv};
pub use crate::color::transform::{
    ColorPipeline, TransformConfig, boost_saturation, clamp_brightness, reconcile_channels,
    tone_map,
};
pub use crate::extract::edge::{EdgeSelection, edge_line, fit_to_edge, sample_edge};
pub use crate::extract::extractor::{ExtractConfig, Extracted, FrameExtractor, FrameResult};
pub use crate::frame::buffer::{ChannelBuffer, Frame};
pub use crate::frame::resize::resize_area;
pub use crate::output::json::{
    FrameRecord, OutputLayout, OutputOpts, read_records, to_records, write_output,
};
pub use crate::output::preview::{
    FfmpegPreviewOpts, FfmpegPreviewSink, InMemoryPreviewSink, PreviewConfig, PreviewSink,
    default_preview_path,
};
pub use crate::pipeline::assemble::{Assembled, ResultAssembler};
pub use crate::pipeline::batch::{Batch, BatchIter, ScheduleOpts, default_num_workers};
pub use crate::pipeline::run::{PipelineConfig, PipelineOutput, RunStats, run_pipeline};
pub use crate::pipeline::smooth::TemporalSmoother;
pub use crate::pipeline::worker::{BatchOutput, FrameFailure, process_batch};
pub use crate::source::ffmpeg::{FfmpegSource, is_ffmpeg_on_path, probe_video};
pub use crate::source::memory::InMemorySource;
pub use crate::source::{FrameSource, VideoInfo};
