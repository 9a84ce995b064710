// Crop interactor - Orchestrates the crop use case around the job runner

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::model::*;
use crate::engine::{JobHandle, JobObserver, JobRunner};
use crate::error::{CropError, CropResult};
use crate::ports::*;

/// Interactor for the crop use case.
///
/// Applies the caller-side gates (write access, input materialization,
/// duration probe) before a job reaches the runner.
pub struct CropInteractor {
    fs_port: Arc<dyn FsPort>,
    player_port: Arc<dyn PlayerPort>,
    runner: JobRunner,
    asset: Option<PathBuf>,
    remove_partial_output: bool,
}

impl CropInteractor {
    /// Create new crop interactor with injected ports
    pub fn new(
        fs_port: Arc<dyn FsPort>,
        player_port: Arc<dyn PlayerPort>,
        runner: JobRunner,
    ) -> Self {
        Self {
            fs_port,
            player_port,
            runner,
            asset: None,
            remove_partial_output: false,
        }
    }

    /// Bundled media copied to the input path when that path is missing
    pub fn with_asset(mut self, asset: Option<PathBuf>) -> Self {
        self.asset = asset;
        self
    }

    pub fn with_partial_output_removal(mut self, enabled: bool) -> Self {
        self.remove_partial_output = enabled;
        self
    }

    pub fn runner(&self) -> &JobRunner {
        &self.runner
    }

    /// Validate, prepare and start a crop job
    pub async fn request_crop<O>(&self, request: CropRequest, observer: &Arc<O>) -> CropResult<JobHandle>
    where
        O: JobObserver + 'static,
    {
        if self.runner.is_running() {
            return Err(CropError::AlreadyRunning);
        }

        self.ensure_write_access(&request.output_path).await?;
        self.materialize_input(&request.input_path).await?;

        let job = self.runner.prepare(request).await?;
        info!(
            duration_ms = job.total_duration_ms(),
            command = %job.command_line(),
            "Prepared crop job"
        );

        Ok(self.runner.start(job, observer)?)
    }

    /// Request cancellation of the running job
    pub fn cancel(&self) -> bool {
        self.runner.cancel()
    }

    /// Permission gate: the output directory is created if missing and must
    /// be writable before a job is started
    pub async fn ensure_write_access(&self, output_path: &Path) -> CropResult<()> {
        let dir = output_directory(output_path);
        if let Err(e) = self.fs_port.create_directory(&dir).await {
            warn!(dir = %dir.display(), error = %e, "Could not create output directory");
        }
        if !self.fs_port.can_write_to_directory(&dir).await? {
            return Err(CropError::PermissionDenied {
                path: dir.display().to_string(),
            });
        }
        Ok(())
    }

    /// Copy the bundled asset to `input_path` on first use. Returns true when
    /// a copy was made.
    pub async fn materialize_input(&self, input_path: &Path) -> CropResult<bool> {
        if self.fs_port.file_exists(input_path).await? {
            return Ok(false);
        }

        let Some(asset) = self.asset.as_deref() else {
            return Err(CropError::InputFileNotFound {
                path: input_path.display().to_string(),
            });
        };

        info!(
            asset = %asset.display(),
            input = %input_path.display(),
            "Materializing input from bundled asset"
        );
        self.fs_port.copy_file(asset, input_path).await?;
        Ok(true)
    }

    /// Post-completion housekeeping: removes the output of a failed or
    /// cancelled job when configured to
    pub async fn finish(&self, report: &CompletionReport) -> CropResult<()> {
        if self.remove_partial_output && !report.outcome.is_success() {
            warn!(
                output = %report.output_path.display(),
                outcome = %report.outcome,
                "Removing partial output"
            );
            self.fs_port.delete_file(&report.output_path).await?;
        }
        Ok(())
    }

    /// Hand the source media to the player, copying the bundled asset into
    /// place first when needed
    pub async fn present_source(&self, input_path: &Path) -> CropResult<()> {
        self.materialize_input(input_path).await?;
        self.player_port.present(input_path).await?;
        Ok(())
    }

    /// Hand a successful result to the player. Returns false for jobs that
    /// did not succeed.
    pub async fn present(&self, report: &CompletionReport) -> CropResult<bool> {
        if !report.outcome.is_success() {
            return Ok(false);
        }
        self.player_port.present(&report.output_path).await?;
        Ok(true)
    }
}

fn output_directory(output_path: &Path) -> PathBuf {
    match output_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_directory() {
        assert_eq!(output_directory(Path::new("out.mp4")), PathBuf::from("."));
        assert_eq!(
            output_directory(Path::new("/movies/out.mp4")),
            PathBuf::from("/movies")
        );
        assert_eq!(
            output_directory(Path::new("movies/cropped/out.mp4")),
            PathBuf::from("movies/cropped")
        );
    }
}
