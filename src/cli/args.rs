//! Command-line argument definitions

use std::path::PathBuf;

use clap::{Args, ValueEnum};

/// How progress is reported while a crop runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ProgressMode {
    /// Progress bar on stdout
    #[default]
    Console,
    /// One JSON event per line on stdout
    Json,
    /// No progress output
    #[value(name = "none")]
    Quiet,
}

/// Arguments for the crop command
#[derive(Args, Debug, Default)]
pub struct CropArgs {
    /// Input video file path
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Output file path, overwritten on every run
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Bundled sample copied to the input path when it is missing
    #[arg(long)]
    pub asset: Option<PathBuf>,

    /// Crop width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Crop height in pixels
    #[arg(long)]
    pub height: Option<u32>,

    /// Horizontal offset of the crop's top-left corner
    #[arg(short = 'x', long = "x")]
    pub x: Option<u32>,

    /// Vertical offset of the crop's top-left corner
    #[arg(short = 'y', long = "y")]
    pub y: Option<u32>,

    /// Codec used to decode the input
    #[arg(long)]
    pub decoder: Option<String>,

    /// Codec used to encode the output
    #[arg(long)]
    pub encoder: Option<String>,

    /// Path to the ffmpeg binary
    #[arg(long)]
    pub ffmpeg: Option<PathBuf>,

    /// Path to the ffprobe binary
    #[arg(long)]
    pub ffprobe: Option<PathBuf>,

    /// Progress output format
    #[arg(long, value_enum, default_value_t = ProgressMode::Console)]
    pub progress: ProgressMode,

    /// Open the source video in ffplay before cropping
    #[arg(long)]
    pub play_source: bool,

    /// Open the result in ffplay when the crop succeeds
    #[arg(long)]
    pub play: bool,

    /// Print the ffmpeg command line and exit
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the probe command
#[derive(Args, Debug, Default)]
pub struct ProbeArgs {
    /// Media file to probe (default: configured input path)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Path to the ffprobe binary
    #[arg(long)]
    pub ffprobe: Option<PathBuf>,
}
