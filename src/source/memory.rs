use std::collections::VecDeque;

use image::RgbImage;

use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{AmbilightError, AmbilightResult};
use crate::frame::buffer::Frame;
use crate::source::{FrameSource, VideoInfo};

/// Source over frames already decoded into memory.
///
/// Indices are assigned `0..` in insertion order. Frames are not checked for size; a mismatched
/// frame is yielded as is and rejected later by the worker that processes it.
#[derive(Debug)]
pub struct InMemorySource {
    info: VideoInfo,
    frames: VecDeque<Frame>,
}

impl InMemorySource {
    /// Build a source from `image` buffers. The first image fixes the reported dimensions.
    pub fn from_images(images: Vec<RgbImage>, fps: Fps) -> AmbilightResult<Self> {
        let (width, height) = images
            .first()
            .map(|img| img.dimensions())
            .ok_or_else(|| AmbilightError::source("in-memory source has no frames"))?;
        let frames = images
            .into_iter()
            .enumerate()
            .map(|(i, img)| Frame::from_rgb_image(FrameIndex(i as u64), img))
            .collect();
        Ok(Self::with_frames(width, height, fps, frames))
    }

    /// Build a source from raw RGB8 buffers of a declared size.
    pub fn from_raw(width: u32, height: u32, fps: Fps, buffers: Vec<Vec<u8>>) -> Self {
        let frames = buffers
            .into_iter()
            .enumerate()
            .map(|(i, data)| Frame {
                index: FrameIndex(i as u64),
                width,
                height,
                data,
            })
            .collect();
        Self::with_frames(width, height, fps, frames)
    }

    /// `count` frames of one solid color.
    pub fn solid(width: u32, height: u32, fps: Fps, rgb: [u8; 3], count: usize) -> Self {
        let frame = rgb.repeat(width as usize * height as usize);
        Self::from_raw(width, height, fps, vec![frame; count])
    }

    fn with_frames(width: u32, height: u32, fps: Fps, frames: VecDeque<Frame>) -> Self {
        Self {
            info: VideoInfo {
                width,
                height,
                frame_count: frames.len() as u64,
                fps,
            },
            frames,
        }
    }

    /// Frames not yet read.
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl FrameSource for InMemorySource {
    fn info(&self) -> &VideoInfo {
        &self.info
    }

    fn next_frame(&mut self) -> AmbilightResult<Option<Frame>> {
        Ok(self.frames.pop_front())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/source/memory.rs"]
mod tests;
