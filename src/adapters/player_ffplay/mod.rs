// FFplay player adapter - hands finished media to an external player

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::info;

use crate::domain::errors::*;
use crate::ports::*;

/// Plays media with `ffplay`, waiting until the window is closed
pub struct FFplayAdapter {
    ffplay_path: PathBuf,
}

impl FFplayAdapter {
    pub fn new(ffplay_path: impl Into<PathBuf>) -> Self {
        Self {
            ffplay_path: ffplay_path.into(),
        }
    }
}

#[async_trait]
impl PlayerPort for FFplayAdapter {
    async fn present(&self, media_path: &Path) -> Result<(), DomainError> {
        info!(media = %media_path.display(), "Opening player");

        let status = Command::new(&self.ffplay_path)
            .args(["-autoexit", "-loglevel", "error"])
            .arg(media_path)
            .status()
            .await
            .map_err(|e| {
                DomainError::LaunchFailed(format!(
                    "Failed to start {}: {}",
                    self.ffplay_path.display(),
                    e
                ))
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(DomainError::ProcessingError(format!(
                "Player exited with {}",
                status
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_player_is_launch_failure() {
        let player = FFplayAdapter::new("/nonexistent/cropx/ffplay");
        let result = player.present(Path::new("out.mp4")).await;
        assert!(matches!(result, Err(DomainError::LaunchFailed(_))));
    }
}
