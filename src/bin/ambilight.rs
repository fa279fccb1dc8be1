use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use ambilight::{
    ColorFormat, EdgeSelection, ExtractConfig, FfmpegPreviewOpts, FfmpegPreviewSink, FfmpegSource,
    OutputLayout, OutputOpts, PipelineConfig, PreviewSink, ScheduleOpts, TransformConfig,
};

#[derive(Parser, Debug)]
#[command(name = "ambilight", version, about = "Extract ambient-lighting LED colors from video")]
struct Cli {
    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract an LED color sequence from a video (requires `ffmpeg` on PATH).
    Extract(ExtractArgs),
    /// Print the properties of a video as JSON.
    Probe(ProbeArgs),
    /// Summarize an existing output file.
    Inspect(InspectArgs),
}

#[derive(Parser, Debug)]
struct ExtractArgs {
    /// Input video.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output file, or a directory to write `output.json` into.
    #[arg(long, default_value = "output.json")]
    out: PathBuf,

    /// Frame edge to sample.
    #[arg(long, value_enum)]
    edge: EdgeChoice,

    /// LED count for left/right edges.
    #[arg(long, default_value_t = 50)]
    target_height: u32,

    /// LED count for top/bottom edges.
    #[arg(long, default_value_t = 50)]
    target_width: u32,

    /// Frames per worker batch.
    #[arg(long, default_value_t = 100)]
    batch_size: usize,

    /// Worker threads. Defaults to available parallelism minus one.
    #[arg(long)]
    num_workers: Option<usize>,

    /// Stop after this many selected frames (0 = all).
    #[arg(long, default_value_t = 0)]
    max_frames: u64,

    /// Frames skipped between processed frames.
    #[arg(long, default_value_t = 0)]
    frame_skip: u64,

    /// Batches dispatched but not finished at once. Defaults to twice the worker count.
    #[arg(long)]
    max_in_flight: Option<usize>,

    /// Working color space for sampling.
    #[arg(long, value_enum, default_value_t = FormatChoice::Rgb)]
    color_format: FormatChoice,

    /// Channel layout of the emitted LED values.
    #[arg(long, value_enum, default_value_t = FormatChoice::Rgb)]
    output_color_format: FormatChoice,

    /// Tone curve midpoint.
    #[arg(long, default_value_t = 0.5)]
    midpoint: f64,

    /// Tone curve steepness.
    #[arg(long, default_value_t = 10.0)]
    steepness: f64,

    /// Maximum sum of channels per LED.
    #[arg(long, default_value_t = 220)]
    max_brightness: u32,

    /// Saturation multiplier for RGB output.
    #[arg(long, default_value_t = 1.2)]
    saturation_factor: f64,

    /// Weight of the current frame in temporal smoothing, in (0, 1].
    #[arg(long, default_value_t = 0.3)]
    temporal_alpha: f64,

    /// Gzip the output file.
    #[arg(long)]
    compress: bool,

    /// Output document shape.
    #[arg(long, value_enum, default_value_t = LayoutChoice::Records)]
    layout: LayoutChoice,

    /// Number frames from 1 in the output.
    #[arg(long)]
    one_based_frames: bool,

    /// Also write a video of the resized frames.
    #[arg(long)]
    preview: bool,

    /// Preview video path. Defaults to `<video stem>_resized.<ext>` next to the output.
    #[arg(long, requires = "preview")]
    preview_out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct ProbeArgs {
    /// Input video.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct InspectArgs {
    /// Output file written by `extract` (plain or `.gz`).
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum EdgeChoice {
    Left,
    Right,
    Top,
    Bottom,
}

impl From<EdgeChoice> for EdgeSelection {
    fn from(c: EdgeChoice) -> Self {
        match c {
            EdgeChoice::Left => Self::Left,
            EdgeChoice::Right => Self::Right,
            EdgeChoice::Top => Self::Top,
            EdgeChoice::Bottom => Self::Bottom,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatChoice {
    Rgb,
    Rgbw,
    Hsv,
    #[value(name = "rgbwmix")]
    RgbwMix,
}

impl From<FormatChoice> for ColorFormat {
    fn from(c: FormatChoice) -> Self {
        match c {
            FormatChoice::Rgb => Self::Rgb,
            FormatChoice::Rgbw => Self::Rgbw,
            FormatChoice::Hsv => Self::Hsv,
            FormatChoice::RgbwMix => Self::RgbwMix,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LayoutChoice {
    Records,
    Tagged,
}

impl From<LayoutChoice> for OutputLayout {
    fn from(c: LayoutChoice) -> Self {
        match c {
            LayoutChoice::Records => Self::Records,
            LayoutChoice::Tagged => Self::Tagged,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);
    match cli.cmd {
        Command::Extract(args) => cmd_extract(args),
        Command::Probe(args) => cmd_probe(args),
        Command::Inspect(args) => cmd_inspect(args),
    }
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn pipeline_config(args: &ExtractArgs) -> PipelineConfig {
    let defaults = ScheduleOpts::default();
    PipelineConfig {
        extract: ExtractConfig {
            edge: args.edge.into(),
            target_height: args.target_height,
            target_width: args.target_width,
            color_format: args.color_format.into(),
            output_color_format: args.output_color_format.into(),
            transform: TransformConfig {
                midpoint: args.midpoint,
                steepness: args.steepness,
                max_brightness: args.max_brightness,
                saturation_factor: args.saturation_factor,
            },
            keep_preview: args.preview,
        },
        schedule: ScheduleOpts {
            batch_size: args.batch_size,
            num_workers: args.num_workers.unwrap_or(defaults.num_workers),
            max_frames: args.max_frames,
            frame_skip: args.frame_skip,
            max_in_flight: args.max_in_flight,
        },
        temporal_alpha: args.temporal_alpha,
    }
}

fn preview_path(args: &ExtractArgs) -> PathBuf {
    if let Some(p) = &args.preview_out {
        return p.clone();
    }
    let dir = if args.out.is_dir() {
        args.out.as_path()
    } else {
        args.out.parent().unwrap_or_else(|| Path::new("."))
    };
    ambilight::default_preview_path(&args.in_path, dir)
}

fn cmd_extract(args: ExtractArgs) -> anyhow::Result<()> {
    let cfg = pipeline_config(&args);
    cfg.validate().context("invalid configuration")?;
    let out_opts = OutputOpts {
        path: args.out.clone(),
        compress: args.compress,
        layout: args.layout.into(),
        one_based_frames: args.one_based_frames,
    };
    out_opts.validate().context("invalid output options")?;

    let mut preview = args
        .preview
        .then(|| FfmpegPreviewSink::new(FfmpegPreviewOpts::new(preview_path(&args))));

    let out = {
        let mut source = FfmpegSource::open(&args.in_path)
            .with_context(|| format!("open video '{}'", args.in_path.display()))?;
        ambilight::run_pipeline(
            &mut source,
            &cfg,
            preview.as_mut().map(|s| s as &mut dyn PreviewSink),
        )
        .with_context(|| format!("extract '{}'", args.in_path.display()))?
    };
    if out.frames.is_empty() {
        tracing::warn!(
            video = %args.in_path.display(),
            dropped = out.stats.frames_dropped,
            "no frames survived extraction, writing an empty sequence"
        );
    }

    let path = ambilight::write_output(&out.frames, cfg.extract.output_color_format, &out_opts)
        .context("write output")?;
    eprintln!("wrote {}", path.display());
    if let Some(sink) = &preview {
        eprintln!("wrote {}", sink.out_path().display());
    }
    Ok(())
}

fn cmd_probe(args: ProbeArgs) -> anyhow::Result<()> {
    let info = ambilight::probe_video(&args.in_path)
        .with_context(|| format!("probe '{}'", args.in_path.display()))?;
    println!("{}", serde_json::to_string_pretty(&info)?);
    Ok(())
}

fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let records = ambilight::read_records(&args.in_path)
        .with_context(|| format!("read '{}'", args.in_path.display()))?;
    let (Some(first), Some(last)) = (records.first(), records.last()) else {
        println!("{}: 0 frames", args.in_path.display());
        return Ok(());
    };
    let leds = first.pixels.len();
    let channels = first.pixels.first().map_or(0, Vec::len);
    let gaps = records
        .windows(2)
        .filter(|w| w[1].frame != w[0].frame + 1)
        .count();
    println!(
        "{}: {} frames ({}..={}), {} leds x {} channels, {} gaps",
        args.in_path.display(),
        records.len(),
        first.frame,
        last.frame,
        leds,
        channels,
        gaps
    );
    Ok(())
}
