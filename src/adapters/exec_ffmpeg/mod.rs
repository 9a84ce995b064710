//! FFmpeg execution adapter
//!
//! Runs the `ffmpeg` binary as a child process and exposes its stderr as a
//! stream of lines. ffmpeg ends its periodic stats line with `\r`, so both
//! `\r` and `\n` terminate a line.

use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};

use async_trait::async_trait;
use futures::StreamExt;
use tokio::process::{Child, ChildStderr, Command};
use tokio_util::codec::{AnyDelimiterCodec, FramedRead};
use tracing::{debug, warn};

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

/// Exit code ffmpeg uses when it stops on an interrupt signal
const FFMPEG_INTERRUPTED_EXIT_CODE: i32 = 255;

/// Longest single output line accepted before the stream is abandoned
const MAX_LINE_LENGTH: usize = 64 * 1024;

/// FFmpeg-based execution adapter
pub struct FFmpegAdapter {
    ffmpeg_path: PathBuf,
}

impl FFmpegAdapter {
    /// Create new FFmpeg adapter
    pub fn new(ffmpeg_path: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
        }
    }

    pub fn ffmpeg_path(&self) -> &Path {
        &self.ffmpeg_path
    }
}

#[async_trait]
impl TranscodePort for FFmpegAdapter {
    async fn launch(&self, arguments: &[String]) -> Result<Box<dyn TranscodeProcess>, DomainError> {
        debug!(ffmpeg = %self.ffmpeg_path.display(), ?arguments, "Launching ffmpeg");

        let mut child = Command::new(&self.ffmpeg_path)
            .args(arguments)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    DomainError::LaunchFailed(format!(
                        "ffmpeg not found at {}",
                        self.ffmpeg_path.display()
                    ))
                } else {
                    DomainError::LaunchFailed(format!("Failed to start ffmpeg: {}", e))
                }
            })?;

        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| DomainError::InternalError("ffmpeg stderr was not captured".to_string()))?;

        Ok(Box::new(FFmpegProcess {
            child,
            lines: Some(FramedRead::new(
                stderr,
                AnyDelimiterCodec::new_with_max_length(b"\r\n".to_vec(), b"\n".to_vec(), MAX_LINE_LENGTH),
            )),
            terminated: false,
        }))
    }
}

/// A running ffmpeg child process
pub struct FFmpegProcess {
    child: Child,
    lines: Option<FramedRead<ChildStderr, AnyDelimiterCodec>>,
    terminated: bool,
}

#[async_trait]
impl TranscodeProcess for FFmpegProcess {
    async fn next_line(&mut self) -> Result<Option<String>, DomainError> {
        let Some(lines) = self.lines.as_mut() else {
            return Ok(None);
        };

        loop {
            match lines.next().await {
                Some(Ok(chunk)) => {
                    if chunk.is_empty() {
                        continue;
                    }
                    return Ok(Some(String::from_utf8_lossy(&chunk).into_owned()));
                }
                Some(Err(e)) => {
                    self.lines = None;
                    return Err(DomainError::ProcessingError(format!(
                        "Failed to read ffmpeg output: {}",
                        e
                    )));
                }
                None => {
                    self.lines = None;
                    return Ok(None);
                }
            }
        }
    }

    async fn terminate(&mut self) -> Result<(), DomainError> {
        self.terminated = true;
        match self.child.start_kill() {
            Ok(()) => Ok(()),
            // Already exited
            Err(e) if e.kind() == std::io::ErrorKind::InvalidInput => Ok(()),
            Err(e) => Err(DomainError::ProcessingError(format!(
                "Failed to stop ffmpeg: {}",
                e
            ))),
        }
    }

    async fn wait(&mut self) -> Result<EngineResult, DomainError> {
        // Drop the pipe so a child blocked on a full stderr buffer can exit
        self.lines = None;
        let status = self
            .child
            .wait()
            .await
            .map_err(|e| DomainError::ProcessingError(format!("Failed to wait for ffmpeg: {}", e)))?;

        let result = classify_exit(&status, self.terminated);
        if result == EngineResult::Error {
            warn!(%status, "ffmpeg exited with failure");
        } else {
            debug!(%status, ?result, "ffmpeg exited");
        }
        Ok(result)
    }
}

/// Map an exit status onto the engine's tri-state result
pub fn classify_exit(status: &ExitStatus, terminated: bool) -> EngineResult {
    classify_exit_code(status.code(), terminated)
}

/// `code` is `None` when the process was ended by a signal
pub fn classify_exit_code(code: Option<i32>, terminated: bool) -> EngineResult {
    match code {
        Some(0) => EngineResult::Success,
        Some(FFMPEG_INTERRUPTED_EXIT_CODE) => EngineResult::Cancelled,
        _ if terminated => EngineResult::Cancelled,
        _ => EngineResult::Error,
    }
}
