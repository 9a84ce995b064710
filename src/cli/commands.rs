//! Command implementations

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::adapters::FFprobeAdapter;
use crate::app::{AppContainer, CropInteractor, DefaultAppContainer};
use crate::cli::args::{CropArgs, ProbeArgs, ProgressMode};
use crate::domain::config::AppConfig;
use crate::domain::model::{CompletionReport, CropRequest, JobOutcome, TranscodeJob};
use crate::engine::{CallbackQueue, ChannelExecutor, ConsoleObserver, JobObserver, JsonObserver, NoOpObserver};
use crate::ports::ProbePort;

/// Execute the crop command
pub async fn crop(config: &AppConfig, args: &CropArgs) -> Result<()> {
    let request = CropRequest::new(
        config.paths.input.clone(),
        config.paths.output.clone(),
        config.crop,
    );

    if args.dry_run {
        let job = TranscodeJob::new(request, &config.transcode);
        println!("{} {}", config.engine.ffmpeg_path.display(), job.command_line());
        return Ok(());
    }

    info!("Input: {}", config.paths.input.display());
    info!("Output: {}", config.paths.output.display());
    info!("Crop: {}", config.crop);

    // Callbacks are posted to this queue and run on this task only
    let (executor, queue) = ChannelExecutor::new();
    let container = DefaultAppContainer::new(config, Arc::new(executor))
        .context("Failed to initialize application")?;
    let interactor = container.crop_interactor();

    if args.play_source {
        interactor
            .present_source(&request.input_path)
            .await
            .context("Failed to open the source video")?;
    }

    let report = match args.progress {
        ProgressMode::Console => run_job(&interactor, request, Arc::new(ConsoleObserver::new()), queue).await?,
        ProgressMode::Json => run_job(&interactor, request, Arc::new(JsonObserver), queue).await?,
        ProgressMode::Quiet => run_job(&interactor, request, Arc::new(NoOpObserver), queue).await?,
    };

    interactor.finish(&report).await?;

    match &report.outcome {
        JobOutcome::Succeeded => {
            if args.play {
                interactor
                    .present(&report)
                    .await
                    .context("Failed to open the cropped video")?;
            }
            info!("Crop operation completed successfully");
            Ok(())
        }
        JobOutcome::Cancelled => Err(anyhow::anyhow!("Crop cancelled")),
        JobOutcome::Failed { reason } => Err(anyhow::anyhow!("Crop failed: {}", reason)),
    }
}

/// Start the job and pump callbacks on the current task until it finishes.
/// Ctrl-C requests cancellation.
async fn run_job<O>(
    interactor: &CropInteractor,
    request: CropRequest,
    observer: Arc<O>,
    mut queue: CallbackQueue,
) -> Result<CompletionReport>
where
    O: JobObserver + 'static,
{
    let mut handle = interactor.request_crop(request, &observer).await?;
    let mut interrupted = false;

    let report = loop {
        tokio::select! {
            Some(callback) = queue.next() => callback(),
            signal = tokio::signal::ctrl_c(), if !interrupted => {
                interrupted = true;
                match signal {
                    Ok(()) => {
                        warn!("Interrupt received, cancelling crop");
                        handle.cancel();
                    }
                    Err(e) => warn!("Failed to listen for interrupt: {}", e),
                }
            }
            report = handle.join() => break report?,
        }
    };

    // Completion was posted before the task finished
    queue.run_pending();
    Ok(report)
}

/// Execute the probe command
pub async fn probe(config: &AppConfig, _args: &ProbeArgs) -> Result<()> {
    let input = &config.paths.input;
    info!("Probing: {}", input.display());

    let probe = FFprobeAdapter::new(config.engine.ffprobe_path.clone());
    let duration_ms = probe
        .probe_duration_ms(input)
        .await
        .with_context(|| format!("Failed to probe {}", input.display()))?;

    println!("{}", duration_ms);
    Ok(())
}
