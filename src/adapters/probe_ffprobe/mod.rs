//! FFprobe adapter for media file probing
//!
//! Resolves the total duration of a media file by asking `ffprobe` for the
//! container-level duration in JSON form.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;
use tracing::debug;

use crate::domain::errors::*;
use crate::ports::*;

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    format: Option<FormatSection>,
}

#[derive(Debug, Deserialize)]
struct FormatSection {
    duration: Option<String>,
}

/// FFprobe-based probe adapter
pub struct FFprobeAdapter {
    ffprobe_path: PathBuf,
}

impl FFprobeAdapter {
    /// Create new FFprobe adapter
    pub fn new(ffprobe_path: impl Into<PathBuf>) -> Self {
        Self {
            ffprobe_path: ffprobe_path.into(),
        }
    }
}

#[async_trait]
impl ProbePort for FFprobeAdapter {
    async fn probe_duration_ms(&self, file_path: &Path) -> Result<u64, DomainError> {
        let output = Command::new(&self.ffprobe_path)
            .args(["-v", "error", "-show_entries", "format=duration", "-of", "json"])
            .arg(file_path)
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    DomainError::ProbeFailed(format!(
                        "ffprobe not found at {}",
                        self.ffprobe_path.display()
                    ))
                } else {
                    DomainError::ProbeFailed(format!("Failed to run ffprobe: {}", e))
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DomainError::ProbeFailed(format!(
                "{}: {}",
                file_path.display(),
                stderr.trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        debug!(output = %stdout, "ffprobe output");
        parse_duration_ms(&stdout)
    }
}

/// Extract the container duration from ffprobe's JSON and convert it to
/// whole milliseconds
pub fn parse_duration_ms(json: &str) -> Result<u64, DomainError> {
    let parsed: ProbeOutput = serde_json::from_str(json)
        .map_err(|e| DomainError::ProbeFailed(format!("Unreadable ffprobe output: {}", e)))?;

    let raw = parsed
        .format
        .and_then(|format| format.duration)
        .ok_or_else(|| DomainError::ProbeFailed("Container reports no duration".to_string()))?;

    let seconds: f64 = raw
        .trim()
        .parse()
        .map_err(|_| DomainError::ProbeFailed(format!("Invalid duration value: {}", raw)))?;

    if !seconds.is_finite() || seconds <= 0.0 {
        return Err(DomainError::ProbeFailed(format!(
            "Duration must be positive, got {}",
            raw
        )));
    }

    let millis = (seconds * 1000.0).round();
    if millis < 1.0 || millis >= u64::MAX as f64 {
        return Err(DomainError::ProbeFailed(format!(
            "Duration out of range: {}",
            raw
        )));
    }
    Ok(millis as u64)
}
