use image::RgbImage;

use crate::color::format::{ColorFormat, Pixel, expand_rgb};
use crate::color::hsv::rgb_to_hsv;
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{AmbilightError, AmbilightResult};

/// One decoded video frame.
///
/// `data` is tightly packed RGB8, row-major. Frames are immutable once read and are consumed by
/// exactly one worker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    /// Position in the source video.
    pub index: FrameIndex,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// RGB8 bytes.
    pub data: Vec<u8>,
}

impl Frame {
    /// Wrap an `image` RGB buffer.
    pub fn from_rgb_image(index: FrameIndex, img: RgbImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            index,
            width,
            height,
            data: img.into_raw(),
        }
    }

    /// Check dimensions against the buffer length.
    pub fn validate(&self) -> AmbilightResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(AmbilightError::frame(format!(
                "frame {} has zero dimension {}x{}",
                self.index.0, self.width, self.height
            )));
        }
        let expected = self.width as usize * self.height as usize * 3;
        if self.data.len() != expected {
            return Err(AmbilightError::frame(format!(
                "frame {} data has {} bytes, expected {expected} for {}x{} rgb",
                self.index.0,
                self.data.len(),
                self.width,
                self.height
            )));
        }
        Ok(())
    }
}

/// A row-major image with 3 to 5 interleaved 8-bit channels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChannelBuffer {
    width: u32,
    height: u32,
    channels: usize,
    data: Vec<u8>,
}

impl ChannelBuffer {
    /// Wrap raw interleaved bytes.
    pub fn new(width: u32, height: u32, channels: usize, data: Vec<u8>) -> AmbilightResult<Self> {
        if !(1..=5).contains(&channels) {
            return Err(AmbilightError::validation(format!(
                "unsupported channel count {channels}"
            )));
        }
        if data.len() != width as usize * height as usize * channels {
            return Err(AmbilightError::validation(format!(
                "buffer has {} bytes, expected {}x{}x{channels}",
                data.len(),
                width,
                height
            )));
        }
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    /// Convert a validated RGB frame into the working color space `format`.
    pub fn from_frame(frame: &Frame, format: ColorFormat) -> Self {
        let channels = format.channel_count();
        let mut data = Vec::with_capacity(frame.width as usize * frame.height as usize * channels);
        for px in frame.data.chunks_exact(3) {
            let rgb = [px[0], px[1], px[2]];
            match format {
                ColorFormat::Hsv => data.extend_from_slice(&rgb_to_hsv(rgb)),
                _ => data.extend_from_slice(&expand_rgb(format, rgb)),
            }
        }
        Self {
            width: frame.width,
            height: frame.height,
            channels,
            data,
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Interleaved channel count.
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Raw interleaved bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Channels of the pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        let off = (y as usize * self.width as usize + x as usize) * self.channels;
        &self.data[off..off + self.channels]
    }

    /// Pixels of column `x`, top to bottom.
    pub fn column(&self, x: u32) -> Vec<Pixel> {
        (0..self.height)
            .map(|y| Pixel::from_slice(self.pixel(x, y)))
            .collect()
    }

    /// Pixels of row `y`, left to right.
    pub fn row(&self, y: u32) -> Vec<Pixel> {
        (0..self.width)
            .map(|x| Pixel::from_slice(self.pixel(x, y)))
            .collect()
    }

    /// Reinterpret a 3-channel buffer as an `image` RGB buffer.
    pub fn into_rgb_image(self) -> AmbilightResult<RgbImage> {
        if self.channels != 3 {
            return Err(AmbilightError::validation(format!(
                "cannot view {}-channel buffer as rgb",
                self.channels
            )));
        }
        RgbImage::from_raw(self.width, self.height, self.data)
            .ok_or_else(|| AmbilightError::validation("rgb buffer size mismatch"))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/frame/buffer.rs"]
mod tests;
