//! CLI module for CropX
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod args;
pub mod commands;

pub use args::{CropArgs, ProbeArgs, ProgressMode};

/// CropX video cropper
///
/// Crops a video through ffmpeg, reporting progress as it goes.
#[derive(Parser, Debug)]
#[command(name = "cropper")]
#[command(about = "CropX - crop videos through ffmpeg with live progress")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Configuration file (default: cropx.toml, then config/cropx.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Logging level
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json_log: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Crop a video file
    Crop(CropArgs),
    /// Print the duration of a media file in milliseconds
    Probe(ProbeArgs),
}
