use image::RgbImage;

use crate::color::format::{ColorFormat, Pixel};
use crate::color::transform::{ColorPipeline, TransformConfig};
use crate::extract::edge::{EdgeSelection, fit_to_edge, sample_edge};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{AmbilightError, AmbilightResult};
use crate::frame::buffer::{ChannelBuffer, Frame};

/// Per-frame extraction settings, shared read-only by every worker.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ExtractConfig {
    /// Edge to sample.
    pub edge: EdgeSelection,
    /// LED count for left/right edges.
    pub target_height: u32,
    /// LED count for top/bottom edges.
    pub target_width: u32,
    /// Working color space frames are converted to before resizing.
    pub color_format: ColorFormat,
    /// Channel layout of the emitted LED values.
    pub output_color_format: ColorFormat,
    /// Tone map / brightness / saturation parameters.
    pub transform: TransformConfig,
    /// Also produce the resized RGB frame for a preview stream.
    pub keep_preview: bool,
}

impl ExtractConfig {
    /// Defaults for everything except the edge, which has none.
    pub fn new(edge: EdgeSelection) -> Self {
        Self {
            edge,
            target_height: 50,
            target_width: 50,
            color_format: ColorFormat::Rgb,
            output_color_format: ColorFormat::Rgb,
            transform: TransformConfig::default(),
            keep_preview: false,
        }
    }

    /// Number of LEDs sampled per frame.
    pub fn target_count(&self) -> u32 {
        self.edge.target_count(self.target_height, self.target_width)
    }

    /// Reject non-positive target sizes and bad transform parameters.
    pub fn validate(&self) -> AmbilightResult<()> {
        if self.target_height == 0 || self.target_width == 0 {
            return Err(AmbilightError::validation(
                "target_height and target_width must be > 0",
            ));
        }
        self.transform.validate()
    }
}

/// LED values extracted from one frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameResult {
    /// Source frame this came from.
    pub index: FrameIndex,
    /// Exactly `target_count` pixels in LED order.
    pub pixels: Vec<Pixel>,
}

/// Output of [`FrameExtractor::extract`].
#[derive(Clone, Debug)]
pub struct Extracted {
    /// LED values.
    pub result: FrameResult,
    /// Native RGB frame resized like the sampled one, when previews are enabled.
    pub preview: Option<RgbImage>,
}

/// Stateless per-frame worker body: convert, fit, sample, transform.
#[derive(Clone, Debug)]
pub struct FrameExtractor {
    cfg: ExtractConfig,
    pipeline: ColorPipeline,
    target_count: u32,
}

impl FrameExtractor {
    /// Validate `cfg` and tabulate its color pipeline.
    pub fn new(cfg: ExtractConfig) -> AmbilightResult<Self> {
        cfg.validate()?;
        let pipeline = ColorPipeline::new(cfg.transform, cfg.output_color_format);
        let target_count = cfg.target_count();
        Ok(Self {
            cfg,
            pipeline,
            target_count,
        })
    }

    /// LEDs per frame.
    pub fn target_count(&self) -> u32 {
        self.target_count
    }

    /// Process one frame. Errors are per-frame and never poison the extractor.
    pub fn extract(&self, frame: &Frame) -> AmbilightResult<Extracted> {
        frame.validate()?;

        let working = ChannelBuffer::from_frame(frame, self.cfg.color_format);
        let sampled = sample_edge(&working, self.cfg.edge, self.target_count)?;
        if sampled.len() != self.target_count as usize {
            return Err(AmbilightError::frame(format!(
                "frame {} sampled {} pixels, expected {}",
                frame.index.0,
                sampled.len(),
                self.target_count
            )));
        }
        let pixels = sampled
            .into_iter()
            .map(|px| self.pipeline.apply(px))
            .collect();

        let preview = if self.cfg.keep_preview {
            Some(self.preview(frame, working)?)
        } else {
            None
        };

        Ok(Extracted {
            result: FrameResult {
                index: frame.index,
                pixels,
            },
            preview,
        })
    }

    fn preview(&self, frame: &Frame, working: ChannelBuffer) -> AmbilightResult<RgbImage> {
        let native = if self.cfg.color_format == ColorFormat::Rgb {
            working
        } else {
            ChannelBuffer::from_frame(frame, ColorFormat::Rgb)
        };
        let fitted = fit_to_edge(&native, self.cfg.edge, self.target_count)?.into_owned();
        fitted.into_rgb_image()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/extract/extractor.rs"]
mod tests;
