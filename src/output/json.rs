use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;

use crate::color::format::ColorFormat;
use crate::extract::extractor::FrameResult;
use crate::foundation::error::{AmbilightError, AmbilightResult};

/// File name used when the output path names a directory.
pub const DEFAULT_FILE_NAME: &str = "output.json";

/// One LED frame as written to disk.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FrameRecord {
    /// Frame number.
    pub frame: u64,
    /// One channel vector per LED.
    pub pixels: Vec<Vec<u8>>,
}

/// Top-level shape of the output document.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputLayout {
    /// Bare array of records.
    #[default]
    Records,
    /// `{"color_format": ..., "frames": [...]}`.
    Tagged,
}

impl OutputLayout {
    /// Lower-case name used on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Records => "records",
            Self::Tagged => "tagged",
        }
    }
}

impl fmt::Display for OutputLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputLayout {
    type Err = AmbilightError;

    fn from_str(s: &str) -> AmbilightResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "records" => Ok(Self::Records),
            "tagged" => Ok(Self::Tagged),
            _ => Err(AmbilightError::validation(format!(
                "unknown output layout '{s}' (expected one of: records, tagged)"
            ))),
        }
    }
}

/// Where and how to write the LED sequence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputOpts {
    /// Output file, or a directory to place [`DEFAULT_FILE_NAME`] in.
    pub path: PathBuf,
    /// Gzip the file and append `.gz` to its name.
    pub compress: bool,
    /// Document shape.
    pub layout: OutputLayout,
    /// Number frames from 1 instead of 0.
    pub one_based_frames: bool,
}

impl OutputOpts {
    /// Uncompressed bare records at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            compress: false,
            layout: OutputLayout::Records,
            one_based_frames: false,
        }
    }

    /// Reject an empty path.
    pub fn validate(&self) -> AmbilightResult<()> {
        if self.path.as_os_str().is_empty() {
            return Err(AmbilightError::validation("output path must not be empty"));
        }
        Ok(())
    }

    /// Final file path after the directory and compression rules are applied.
    pub fn resolved_path(&self) -> PathBuf {
        let mut path = if self.path.is_dir() {
            self.path.join(DEFAULT_FILE_NAME)
        } else {
            self.path.clone()
        };
        if self.compress && !has_gz_extension(&path) {
            let mut s = path.into_os_string();
            s.push(".gz");
            path = PathBuf::from(s);
        }
        path
    }
}

#[derive(serde::Serialize)]
struct TaggedRef<'a> {
    color_format: ColorFormat,
    frames: &'a [FrameRecord],
}

#[derive(serde::Deserialize)]
#[serde(untagged)]
enum OutputDoc {
    Records(Vec<FrameRecord>),
    Tagged {
        #[allow(dead_code)]
        color_format: ColorFormat,
        frames: Vec<FrameRecord>,
    },
}

/// Convert LED frames to on-disk records.
pub fn to_records(frames: &[FrameResult], one_based: bool) -> Vec<FrameRecord> {
    let offset = u64::from(one_based);
    frames
        .iter()
        .map(|f| FrameRecord {
            frame: f.index.0 + offset,
            pixels: f.pixels.iter().map(|p| p.as_slice().to_vec()).collect(),
        })
        .collect()
}

/// Write `frames` as pretty-printed JSON according to `opts`. Returns the path written.
pub fn write_output(
    frames: &[FrameResult],
    color_format: ColorFormat,
    opts: &OutputOpts,
) -> AmbilightResult<PathBuf> {
    opts.validate()?;
    let path = opts.resolved_path();
    ensure_parent_dir(&path)?;

    let records = to_records(frames, opts.one_based_frames);
    let file = File::create(&path).map_err(|e| {
        AmbilightError::encode(format!("failed to create '{}': {e}", path.display()))
    })?;
    let writer = BufWriter::new(file);
    if opts.compress {
        let mut gz = GzEncoder::new(writer, Compression::default());
        write_doc(&mut gz, &records, color_format, opts.layout)?;
        let mut inner = gz
            .finish()
            .map_err(|e| AmbilightError::encode(format!("gzip finish failed: {e}")))?;
        flush(&mut inner, &path)?;
    } else {
        let mut writer = writer;
        write_doc(&mut writer, &records, color_format, opts.layout)?;
        flush(&mut writer, &path)?;
    }

    tracing::info!(
        path = %path.display(),
        frames = records.len(),
        compressed = opts.compress,
        "wrote led sequence"
    );
    Ok(path)
}

fn write_doc(
    w: &mut impl Write,
    records: &[FrameRecord],
    color_format: ColorFormat,
    layout: OutputLayout,
) -> AmbilightResult<()> {
    let res = match layout {
        OutputLayout::Records => serde_json::to_writer_pretty(&mut *w, records),
        OutputLayout::Tagged => serde_json::to_writer_pretty(
            &mut *w,
            &TaggedRef {
                color_format,
                frames: records,
            },
        ),
    };
    res.map_err(|e| AmbilightError::serde(e.to_string()))?;
    w.write_all(b"\n")
        .map_err(|e| AmbilightError::encode(format!("write failed: {e}")))
}

fn flush(w: &mut impl Write, path: &Path) -> AmbilightResult<()> {
    w.flush()
        .map_err(|e| AmbilightError::encode(format!("failed to flush '{}': {e}", path.display())))
}

/// Load records written by [`write_output`], in either layout, gzip-compressed or not.
pub fn read_records(path: &Path) -> AmbilightResult<Vec<FrameRecord>> {
    let file = File::open(path).map_err(|e| {
        AmbilightError::source(format!("failed to open '{}': {e}", path.display()))
    })?;
    let mut bytes = Vec::new();
    let read = if has_gz_extension(path) {
        GzDecoder::new(BufReader::new(file)).read_to_end(&mut bytes)
    } else {
        BufReader::new(file).read_to_end(&mut bytes)
    };
    read.map_err(|e| AmbilightError::source(format!("failed to read '{}': {e}", path.display())))?;

    let doc: OutputDoc =
        serde_json::from_slice(&bytes).map_err(|e| AmbilightError::serde(e.to_string()))?;
    Ok(match doc {
        OutputDoc::Records(frames) | OutputDoc::Tagged { frames, .. } => frames,
    })
}

fn has_gz_extension(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"))
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> AmbilightResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/output/json.rs"]
mod tests;
