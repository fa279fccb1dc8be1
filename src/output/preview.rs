use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};

use image::RgbImage;

use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{AmbilightError, AmbilightResult};
use crate::output::json::ensure_parent_dir;

/// Configuration provided to a [`PreviewSink`] before the first frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PreviewConfig {
    /// Width of every pushed frame.
    pub width: u32,
    /// Height of every pushed frame.
    pub height: u32,
    /// Frame rate of the source video.
    pub fps: Fps,
}

/// Consumer of resized preview frames.
///
/// Ordering contract: `push_frame` is called in strictly increasing `FrameIndex` order. Indices
/// may have gaps where frames were skipped or dropped.
pub trait PreviewSink: Send {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: PreviewConfig) -> AmbilightResult<()>;
    /// Push one frame.
    fn push_frame(&mut self, idx: FrameIndex, frame: &RgbImage) -> AmbilightResult<()>;
    /// Called once after the last frame.
    fn end(&mut self) -> AmbilightResult<()>;
}

/// In-memory preview sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemoryPreviewSink {
    cfg: Option<PreviewConfig>,
    frames: Vec<(FrameIndex, RgbImage)>,
    ended: bool,
}

impl InMemoryPreviewSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<PreviewConfig> {
        self.cfg
    }

    /// Captured frames, in push order.
    pub fn frames(&self) -> &[(FrameIndex, RgbImage)] {
        &self.frames
    }

    /// `true` once `end` was called.
    pub fn ended(&self) -> bool {
        self.ended
    }
}

impl PreviewSink for InMemoryPreviewSink {
    fn begin(&mut self, cfg: PreviewConfig) -> AmbilightResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.ended = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &RgbImage) -> AmbilightResult<()> {
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> AmbilightResult<()> {
        self.ended = true;
        Ok(())
    }
}

/// Default preview path: `<video stem>_resized.<video ext>` in `dir`.
pub fn default_preview_path(video: &Path, dir: &Path) -> PathBuf {
    let stem = video
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "preview".to_owned());
    let ext = video
        .extension()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "mp4".to_owned());
    dir.join(format!("{stem}_resized.{ext}"))
}

/// Options for [`FfmpegPreviewSink`].
#[derive(Clone, Debug)]
pub struct FfmpegPreviewOpts {
    /// Output video path.
    pub out_path: PathBuf,
    /// Overwrite an existing file.
    pub overwrite: bool,
}

impl FfmpegPreviewOpts {
    /// Write to `out_path`, overwriting.
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite: true,
        }
    }
}

/// Preview sink that spawns the system `ffmpeg` and streams `rgb24` frames to its stdin.
///
/// Odd frame sizes are padded to even ones for `yuv420p` H.264 output.
pub struct FfmpegPreviewSink {
    opts: FfmpegPreviewOpts,

    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stderr_drain: Option<std::thread::JoinHandle<std::io::Result<Vec<u8>>>>,

    cfg: Option<PreviewConfig>,
    last_idx: Option<FrameIndex>,
}

impl FfmpegPreviewSink {
    /// Create a sink; `ffmpeg` is started in `begin`.
    pub fn new(opts: FfmpegPreviewOpts) -> Self {
        Self {
            opts,
            child: None,
            stdin: None,
            stderr_drain: None,
            cfg: None,
            last_idx: None,
        }
    }

    /// Path the preview is written to.
    pub fn out_path(&self) -> &Path {
        &self.opts.out_path
    }
}

impl PreviewSink for FfmpegPreviewSink {
    fn begin(&mut self, cfg: PreviewConfig) -> AmbilightResult<()> {
        if cfg.width == 0 || cfg.height == 0 {
            return Err(AmbilightError::validation(
                "preview width/height must be non-zero",
            ));
        }
        ensure_parent_dir(&self.opts.out_path)?;
        if !self.opts.overwrite && self.opts.out_path.exists() {
            return Err(AmbilightError::validation(format!(
                "preview file '{}' already exists",
                self.opts.out_path.display()
            )));
        }

        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        cmd.arg(if self.opts.overwrite { "-y" } else { "-n" });
        cmd.args([
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgb24",
            "-s",
            &format!("{}x{}", cfg.width, cfg.height),
            "-r",
            &format!("{}/{}", cfg.fps.num, cfg.fps.den),
            "-i",
            "pipe:0",
            "-an",
            "-vf",
            "pad=ceil(iw/2)*2:ceil(ih/2)*2",
            "-c:v",
            "libx264",
            "-pix_fmt",
            "yuv420p",
        ]);
        cmd.arg(&self.opts.out_path);

        let mut child = cmd.spawn().map_err(|e| {
            AmbilightError::encode(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;
        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| AmbilightError::encode("failed to open ffmpeg stdin (unexpected)"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| AmbilightError::encode("failed to open ffmpeg stderr (unexpected)"))?;
        let stderr_drain = std::thread::spawn(move || {
            let mut bytes = Vec::new();
            stderr.read_to_end(&mut bytes)?;
            Ok(bytes)
        });

        tracing::debug!(
            path = %self.opts.out_path.display(),
            width = cfg.width,
            height = cfg.height,
            "preview encoder started"
        );
        self.child = Some(child);
        self.stdin = Some(stdin);
        self.stderr_drain = Some(stderr_drain);
        self.cfg = Some(cfg);
        self.last_idx = None;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &RgbImage) -> AmbilightResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| AmbilightError::encode("preview sink not started"))?;
        if let Some(last) = self.last_idx
            && idx <= last
        {
            return Err(AmbilightError::encode(
                "preview sink received out-of-order frame index",
            ));
        }
        self.last_idx = Some(idx);

        if frame.dimensions() != (cfg.width, cfg.height) {
            return Err(AmbilightError::validation(format!(
                "preview frame size mismatch: got {}x{}, expected {}x{}",
                frame.width(),
                frame.height(),
                cfg.width,
                cfg.height
            )));
        }

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(AmbilightError::encode("preview sink is already finalized"));
        };
        stdin.write_all(frame.as_raw()).map_err(|e| {
            AmbilightError::encode(format!("failed to write frame to ffmpeg stdin: {e}"))
        })
    }

    fn end(&mut self) -> AmbilightResult<()> {
        drop(self.stdin.take());
        let mut child = self
            .child
            .take()
            .ok_or_else(|| AmbilightError::encode("preview sink not started"))?;
        let status = child.wait().map_err(|e| {
            AmbilightError::encode(format!("failed to wait for ffmpeg to finish: {e}"))
        })?;
        let stderr_bytes = match self.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| AmbilightError::encode("ffmpeg stderr drain thread panicked"))?
                .map_err(|e| AmbilightError::encode(format!("ffmpeg stderr read failed: {e}")))?,
            None => Vec::new(),
        };
        if !status.success() {
            return Err(AmbilightError::encode(format!(
                "ffmpeg exited with status {}: {}",
                status,
                String::from_utf8_lossy(&stderr_bytes).trim()
            )));
        }
        tracing::info!(path = %self.opts.out_path.display(), "wrote preview video");
        self.cfg = None;
        Ok(())
    }
}

impl Drop for FfmpegPreviewSink {
    fn drop(&mut self) {
        drop(self.stdin.take());
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/output/preview.rs"]
mod tests;
