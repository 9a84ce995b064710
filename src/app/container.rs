use std::sync::Arc;

use crate::adapters::{FFmpegAdapter, FFplayAdapter, FFprobeAdapter, LocalFsAdapter};
use crate::app::crop_interactor::CropInteractor;
use crate::domain::config::AppConfig;
use crate::engine::{CallbackExecutor, JobRunner};
use crate::error::CropResult;
use crate::ports::{FsPort, PlayerPort, ProbePort, TranscodePort};

pub trait AppContainer: Send + Sync {
    fn crop_interactor(&self) -> Arc<CropInteractor>;
}

/// Wires the production adapters together once at startup
pub struct DefaultAppContainer {
    crop_interactor: Arc<CropInteractor>,
}

impl DefaultAppContainer {
    pub fn new(config: &AppConfig, executor: Arc<dyn CallbackExecutor>) -> CropResult<Self> {
        config.validate()?;

        let probe_port: Arc<dyn ProbePort> =
            Arc::new(FFprobeAdapter::new(config.engine.ffprobe_path.clone()));
        let transcode_port: Arc<dyn TranscodePort> =
            Arc::new(FFmpegAdapter::new(config.engine.ffmpeg_path.clone()));
        let fs_port: Arc<dyn FsPort> = Arc::new(LocalFsAdapter::new());
        let player_port: Arc<dyn PlayerPort> =
            Arc::new(FFplayAdapter::new(config.engine.ffplay_path.clone()));

        let runner = JobRunner::new(probe_port, transcode_port)
            .with_profile(config.transcode.clone())
            .with_executor(executor);

        let crop_interactor = Arc::new(
            CropInteractor::new(fs_port, player_port, runner)
                .with_asset(config.paths.asset.clone())
                .with_partial_output_removal(config.paths.remove_partial_output),
        );

        Ok(Self { crop_interactor })
    }
}

impl AppContainer for DefaultAppContainer {
    fn crop_interactor(&self) -> Arc<CropInteractor> {
        Arc::clone(&self.crop_interactor)
    }
}
