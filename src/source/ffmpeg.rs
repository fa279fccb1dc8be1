use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdout, Command, Stdio};

use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{AmbilightError, AmbilightResult};
use crate::frame::buffer::Frame;
use crate::source::{FrameSource, VideoInfo};

/// Source that decodes a video file by streaming `rgb24` frames out of the system `ffmpeg`.
///
/// The child process is killed and reaped when the source is dropped, whether or not the stream was
/// read to the end.
pub struct FfmpegSource {
    path: PathBuf,
    info: VideoInfo,
    child: Option<Child>,
    stdout: Option<ChildStdout>,
    stderr_drain: Option<std::thread::JoinHandle<std::io::Result<Vec<u8>>>>,
    frame_len: usize,
    next_index: u64,
    finished: bool,
}

impl std::fmt::Debug for FfmpegSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FfmpegSource")
            .field("path", &self.path)
            .field("info", &self.info)
            .field("next_index", &self.next_index)
            .field("finished", &self.finished)
            .finish_non_exhaustive()
    }
}

impl FfmpegSource {
    /// Probe `path` and start decoding it.
    pub fn open(path: impl Into<PathBuf>) -> AmbilightResult<Self> {
        let path = path.into();
        let info = probe_video(&path)?;
        let frame_len = info.width as usize * info.height as usize * 3;
        if frame_len == 0 {
            return Err(AmbilightError::source(format!(
                "'{}' reports zero frame size",
                path.display()
            )));
        }

        let (child, stdout, stderr_drain) = spawn_decoder(&path)?;
        tracing::debug!(path = %path.display(), ?info, "ffmpeg decoder started");
        Ok(Self {
            path,
            info,
            child: Some(child),
            stdout: Some(stdout),
            stderr_drain: Some(stderr_drain),
            frame_len,
            next_index: 0,
            finished: false,
        })
    }

    /// Path being decoded.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn finish(&mut self) -> AmbilightResult<()> {
        self.finished = true;
        drop(self.stdout.take());
        let Some(mut child) = self.child.take() else {
            return Ok(());
        };
        let status = child
            .wait()
            .map_err(|e| AmbilightError::source(format!("failed to wait for ffmpeg: {e}")))?;
        let stderr_bytes = match self.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| AmbilightError::source("ffmpeg stderr drain thread panicked"))?
                .unwrap_or_default(),
            None => Vec::new(),
        };
        if !status.success() {
            return Err(AmbilightError::source(format!(
                "ffmpeg decode of '{}' exited with status {}: {}",
                self.path.display(),
                status,
                String::from_utf8_lossy(&stderr_bytes).trim()
            )));
        }
        Ok(())
    }
}

impl FrameSource for FfmpegSource {
    fn info(&self) -> &VideoInfo {
        &self.info
    }

    fn next_frame(&mut self) -> AmbilightResult<Option<Frame>> {
        if self.finished {
            return Ok(None);
        }
        let Some(stdout) = self.stdout.as_mut() else {
            return Ok(None);
        };

        let mut data = vec![0u8; self.frame_len];
        let filled = read_full(stdout, &mut data)
            .map_err(|e| AmbilightError::source(format!("failed to read ffmpeg output: {e}")))?;
        if filled == 0 {
            self.finish()?;
            return Ok(None);
        }

        let index = FrameIndex(self.next_index);
        self.next_index += 1;
        if filled < self.frame_len {
            tracing::warn!(
                frame = index.0,
                bytes = filled,
                expected = self.frame_len,
                "truncated trailing frame"
            );
            data.truncate(filled);
            self.finish()?;
        }
        Ok(Some(Frame {
            index,
            width: self.info.width,
            height: self.info.height,
            data,
        }))
    }
}

impl Drop for FfmpegSource {
    fn drop(&mut self) {
        drop(self.stdout.take());
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
        if let Some(handle) = self.stderr_drain.take() {
            let _ = handle.join();
        }
    }
}

/// Read until `buf` is full or the stream ends. Returns the number of bytes read.
fn read_full(r: &mut impl Read, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match r.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

type Decoder = (
    Child,
    ChildStdout,
    std::thread::JoinHandle<std::io::Result<Vec<u8>>>,
);

#[cfg(feature = "media-ffmpeg")]
fn spawn_decoder(path: &Path) -> AmbilightResult<Decoder> {
    let mut child = Command::new("ffmpeg")
        .args(["-v", "error", "-nostdin", "-i"])
        .arg(path)
        .args(["-an", "-f", "rawvideo", "-pix_fmt", "rgb24", "pipe:1"])
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| {
            AmbilightError::source(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| AmbilightError::source("failed to open ffmpeg stdout (unexpected)"))?;
    let mut stderr = child
        .stderr
        .take()
        .ok_or_else(|| AmbilightError::source("failed to open ffmpeg stderr (unexpected)"))?;
    let drain = std::thread::spawn(move || {
        let mut bytes = Vec::new();
        stderr.read_to_end(&mut bytes)?;
        Ok(bytes)
    });
    Ok((child, stdout, drain))
}

#[cfg(not(feature = "media-ffmpeg"))]
fn spawn_decoder(_path: &Path) -> AmbilightResult<Decoder> {
    Err(AmbilightError::source(
        "video decoding requires the 'media-ffmpeg' feature",
    ))
}

/// Read width, height, frame rate and frame count of the first video stream with `ffprobe`.
#[cfg(feature = "media-ffmpeg")]
pub fn probe_video(path: &Path) -> AmbilightResult<VideoInfo> {
    #[derive(serde::Deserialize)]
    struct ProbeStream {
        codec_type: Option<String>,
        width: Option<u32>,
        height: Option<u32>,
        r_frame_rate: Option<String>,
        avg_frame_rate: Option<String>,
        nb_frames: Option<String>,
        duration: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeFormat {
        duration: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeOut {
        streams: Vec<ProbeStream>,
        format: Option<ProbeFormat>,
    }

    if !path.is_file() {
        return Err(AmbilightError::source(format!(
            "video file '{}' not found",
            path.display()
        )));
    }

    let out = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-print_format",
            "json",
            "-show_streams",
            "-show_format",
        ])
        .arg(path)
        .output()
        .map_err(|e| AmbilightError::source(format!("failed to run ffprobe: {e}")))?;
    if !out.status.success() {
        return Err(AmbilightError::source(format!(
            "ffprobe failed for '{}': {}",
            path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    let parsed: ProbeOut = serde_json::from_slice(&out.stdout)
        .map_err(|e| AmbilightError::source(format!("ffprobe json parse failed: {e}")))?;
    let stream = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| {
            AmbilightError::source(format!("no video stream found in '{}'", path.display()))
        })?;
    let width = stream
        .width
        .ok_or_else(|| AmbilightError::source("missing video width from ffprobe"))?;
    let height = stream
        .height
        .ok_or_else(|| AmbilightError::source("missing video height from ffprobe"))?;

    let fps = [stream.r_frame_rate.as_deref(), stream.avg_frame_rate.as_deref()]
        .into_iter()
        .flatten()
        .find_map(|s| Fps::parse_ratio(s).ok())
        .unwrap_or_else(|| {
            tracing::warn!(path = %path.display(), "no usable frame rate, assuming 30 fps");
            Fps::default()
        });

    let duration = stream
        .duration
        .as_deref()
        .or(parsed.format.as_ref().and_then(|f| f.duration.as_deref()));
    let frame_count = frame_count_hint(stream.nb_frames.as_deref(), duration, fps);

    Ok(VideoInfo {
        width,
        height,
        frame_count,
        fps,
    })
}

/// Read width, height, frame rate and frame count of the first video stream with `ffprobe`.
#[cfg(not(feature = "media-ffmpeg"))]
pub fn probe_video(_path: &Path) -> AmbilightResult<VideoInfo> {
    Err(AmbilightError::source(
        "video probing requires the 'media-ffmpeg' feature",
    ))
}

/// Prefer the container's frame count; otherwise estimate it from duration and frame rate.
fn frame_count_hint(nb_frames: Option<&str>, duration_sec: Option<&str>, fps: Fps) -> u64 {
    if let Some(n) = nb_frames.and_then(|s| s.trim().parse::<u64>().ok())
        && n > 0
    {
        return n;
    }
    duration_sec
        .and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|d| d.is_finite() && *d > 0.0)
        .map(|d| fps.secs_to_frames_floor(d))
        .unwrap_or(0)
}

/// Return `true` when both `ffmpeg` and `ffprobe` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    ["ffmpeg", "ffprobe"].into_iter().all(|bin| {
        Command::new(bin)
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    })
}

#[cfg(test)]
#[path = "../../tests/unit/source/ffmpeg.rs"]
mod tests;
