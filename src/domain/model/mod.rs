// Domain models - Core types and data structures

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

#[cfg(test)]
mod tests;

/// Crop rectangle in source pixels: output size plus top-left offset.
///
/// Values are passed to the engine as-is; fitting the rectangle inside the
/// source frame is the caller's job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CropRect {
    pub width: u32,
    pub height: u32,
    pub x: u32,
    pub y: u32,
}

impl CropRect {
    pub fn new(width: u32, height: u32, x: u32, y: u32) -> Self {
        Self {
            width,
            height,
            x,
            y,
        }
    }

    /// Render as an ffmpeg `crop` filter expression
    pub fn filter_expression(&self) -> String {
        format!("crop={}:{}:{}:{}", self.width, self.height, self.x, self.y)
    }
}

impl Default for CropRect {
    fn default() -> Self {
        Self::new(500, 500, 300, 100)
    }
}

impl fmt::Display for CropRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}+{}+{}", self.width, self.height, self.x, self.y)
    }
}

/// Codec names and flag values used when building the engine command line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscodeProfile {
    /// Emit the overwrite-output flag
    pub overwrite: bool,
    /// Codec used to decode the input video stream
    pub decoder: String,
    /// Codec used to encode the output video stream
    pub encoder: String,
    /// Value passed to `-strict`
    pub strict: String,
    /// Upper bound on the muxer's packet queue
    pub max_muxing_queue_size: u32,
    /// Token that precedes the elapsed timestamp in engine output
    pub progress_marker: String,
}

impl Default for TranscodeProfile {
    fn default() -> Self {
        Self {
            overwrite: true,
            decoder: "libopenh264".to_string(),
            encoder: "libopenh264".to_string(),
            strict: "2".to_string(),
            max_muxing_queue_size: 512,
            progress_marker: "time=".to_string(),
        }
    }
}

impl TranscodeProfile {
    /// Check that every engine-facing value is usable
    pub fn validate(&self) -> Result<(), DomainError> {
        let required = [
            ("decoder", &self.decoder),
            ("encoder", &self.encoder),
            ("strict", &self.strict),
            ("progress_marker", &self.progress_marker),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(DomainError::ConfigError(format!(
                    "transcode.{} cannot be empty",
                    name
                )));
            }
        }
        if self.max_muxing_queue_size == 0 {
            return Err(DomainError::ConfigError(
                "transcode.max_muxing_queue_size must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// A crop request as issued by the caller, before the duration is known
#[derive(Debug, Clone, PartialEq)]
pub struct CropRequest {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub crop: CropRect,
}

impl CropRequest {
    pub fn new(input_path: impl Into<PathBuf>, output_path: impl Into<PathBuf>, crop: CropRect) -> Self {
        Self {
            input_path: input_path.into(),
            output_path: output_path.into(),
            crop,
        }
    }
}

/// One crop-transcode invocation.
///
/// The argument list is computed once at construction; the job does not
/// change after it has been handed to a runner.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscodeJob {
    input_path: PathBuf,
    output_path: PathBuf,
    crop: CropRect,
    total_duration_ms: Option<u64>,
    arguments: Vec<String>,
}

impl TranscodeJob {
    /// Build a job and its engine argument list
    pub fn new(request: CropRequest, profile: &TranscodeProfile) -> Self {
        let arguments = build_arguments(&request, profile);
        Self {
            input_path: request.input_path,
            output_path: request.output_path,
            crop: request.crop,
            total_duration_ms: None,
            arguments,
        }
    }

    /// Attach the probed total duration. Zero is stored as unknown.
    pub fn with_duration_ms(mut self, total_duration_ms: u64) -> Self {
        self.total_duration_ms = (total_duration_ms > 0).then_some(total_duration_ms);
        self
    }

    pub fn input_path(&self) -> &Path {
        &self.input_path
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    pub fn crop(&self) -> CropRect {
        self.crop
    }

    pub fn total_duration_ms(&self) -> Option<u64> {
        self.total_duration_ms
    }

    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }

    /// Arguments joined for display only; never fed back to a shell
    pub fn command_line(&self) -> String {
        self.arguments.join(" ")
    }
}

fn build_arguments(request: &CropRequest, profile: &TranscodeProfile) -> Vec<String> {
    let mut args = Vec::with_capacity(14);

    if profile.overwrite {
        args.push("-y".to_string());
    }

    args.push("-c:v".to_string());
    args.push(profile.decoder.clone());
    args.push("-i".to_string());
    args.push(request.input_path.to_string_lossy().into_owned());

    args.push("-filter:v".to_string());
    args.push(request.crop.filter_expression());
    args.push("-max_muxing_queue_size".to_string());
    args.push(profile.max_muxing_queue_size.to_string());

    args.push("-c:v".to_string());
    args.push(profile.encoder.clone());
    args.push("-strict".to_string());
    args.push(profile.strict.clone());
    args.push(request.output_path.to_string_lossy().into_owned());

    args
}

/// Lifecycle of the job occupying a runner slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobState {
    Idle,
    Running,
    Succeeded,
    Failed,
    Cancelled,
}

impl JobState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobState::Succeeded | JobState::Failed | JobState::Cancelled
        )
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JobState::Idle => "idle",
            JobState::Running => "running",
            JobState::Succeeded => "succeeded",
            JobState::Failed => "failed",
            JobState::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

/// Elapsed engine time extracted from one output line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressSample {
    pub elapsed_ms: u64,
}

/// Completion percentage, always within 0..=100
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgressPercent(u8);

impl ProgressPercent {
    pub const ZERO: ProgressPercent = ProgressPercent(0);
    pub const COMPLETE: ProgressPercent = ProgressPercent(100);

    /// Clamp an arbitrary integer percentage into range
    pub fn clamped(raw: i128) -> Self {
        Self(raw.clamp(0, 100) as u8)
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for ProgressPercent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Tri-state result reported by the external engine on exit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineResult {
    Success,
    Cancelled,
    Error,
}

/// Terminal outcome of a job, delivered once through `on_complete`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum JobOutcome {
    Succeeded,
    Cancelled,
    Failed { reason: String },
}

impl JobOutcome {
    /// Terminal runner state matching this outcome
    pub fn state(&self) -> JobState {
        match self {
            JobOutcome::Succeeded => JobState::Succeeded,
            JobOutcome::Cancelled => JobState::Cancelled,
            JobOutcome::Failed { .. } => JobState::Failed,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, JobOutcome::Succeeded)
    }
}

impl fmt::Display for JobOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobOutcome::Succeeded => f.write_str("succeeded"),
            JobOutcome::Cancelled => f.write_str("cancelled"),
            JobOutcome::Failed { reason } => write!(f, "failed: {}", reason),
        }
    }
}

/// Summary handed to the observer when a job terminates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionReport {
    pub job_id: u64,
    pub outcome: JobOutcome,
    pub output_path: PathBuf,
    pub last_percent: Option<ProgressPercent>,
    pub progress_updates: u64,
    pub elapsed: Duration,
}
