//! Single-slot job runner
//!
//! A [`JobRunner`] owns one background execution slot. `start` moves the
//! slot to `Running` and spawns a Tokio task that feeds engine output
//! through [`ProgressParser`] and [`ProgressTracker`], posts progress to the
//! configured [`CallbackExecutor`], classifies the engine's exit and posts a
//! single completion. A second `start` while a job is running is rejected.

use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::Instant;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use crate::domain::errors::DomainError;
use crate::domain::model::*;
use crate::engine::dispatch::{CallbackExecutor, InlineExecutor};
use crate::engine::observer::JobObserver;
use crate::engine::progress::{ProgressParser, ProgressTracker};
use crate::ports::{ProbePort, TranscodePort, TranscodeProcess};

struct RunnerSlot {
    state: JobState,
    job_id: u64,
    cancel: Option<CancellationToken>,
}

/// Drives one transcode job at a time
#[derive(Clone)]
pub struct JobRunner {
    probe: Arc<dyn ProbePort>,
    transcoder: Arc<dyn TranscodePort>,
    executor: Arc<dyn CallbackExecutor>,
    profile: TranscodeProfile,
    slot: Arc<Mutex<RunnerSlot>>,
}

impl JobRunner {
    /// Create a runner with the default profile and inline callback delivery
    pub fn new(probe: Arc<dyn ProbePort>, transcoder: Arc<dyn TranscodePort>) -> Self {
        Self {
            probe,
            transcoder,
            executor: Arc::new(InlineExecutor),
            profile: TranscodeProfile::default(),
            slot: Arc::new(Mutex::new(RunnerSlot {
                state: JobState::Idle,
                job_id: 0,
                cancel: None,
            })),
        }
    }

    /// Use a specific transcode profile for jobs built by `prepare`
    pub fn with_profile(mut self, profile: TranscodeProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Deliver observer callbacks through `executor`
    pub fn with_executor(mut self, executor: Arc<dyn CallbackExecutor>) -> Self {
        self.executor = executor;
        self
    }

    pub fn profile(&self) -> &TranscodeProfile {
        &self.profile
    }

    /// Current state of the slot
    pub fn state(&self) -> JobState {
        self.lock_slot()
            .map(|slot| slot.state)
            .unwrap_or(JobState::Failed)
    }

    pub fn is_running(&self) -> bool {
        self.state() == JobState::Running
    }

    /// Build a job for `request`, probing the input for its total duration.
    ///
    /// A probe that fails or reports no duration is surfaced as
    /// `ProbeFailed`; nothing is launched.
    pub async fn prepare(&self, request: CropRequest) -> Result<TranscodeJob, DomainError> {
        let duration_ms = self
            .probe
            .probe_duration_ms(&request.input_path)
            .await
            .map_err(|e| match e {
                DomainError::ProbeFailed(_) => e,
                other => DomainError::ProbeFailed(other.to_string()),
            })?;

        if duration_ms == 0 {
            return Err(DomainError::ProbeFailed(format!(
                "{} reports a zero duration",
                request.input_path.display()
            )));
        }

        debug!(
            input = %request.input_path.display(),
            duration_ms,
            "Probed input duration"
        );
        Ok(TranscodeJob::new(request, &self.profile).with_duration_ms(duration_ms))
    }

    /// Start `job` in the background and return immediately.
    ///
    /// Must be called from within a Tokio runtime. Fails with
    /// `AlreadyRunning` without touching the current job when the slot is
    /// occupied.
    pub fn start<O>(&self, job: TranscodeJob, observer: &Arc<O>) -> Result<JobHandle, DomainError>
    where
        O: JobObserver + 'static,
    {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| DomainError::InternalError(format!("No async runtime: {}", e)))?;

        let token = CancellationToken::new();
        let job_id = {
            let mut slot = self.lock_slot()?;
            if slot.state == JobState::Running {
                return Err(DomainError::AlreadyRunning(format!(
                    "job {} is still running",
                    slot.job_id
                )));
            }
            slot.job_id += 1;
            slot.state = JobState::Running;
            slot.cancel = Some(token.clone());
            slot.job_id
        };

        info!(
            job_id,
            input = %job.input_path().display(),
            output = %job.output_path().display(),
            crop = %job.crop(),
            "Starting transcode job"
        );

        let observer: Weak<O> = Arc::downgrade(observer);
        let observer: Weak<dyn JobObserver> = observer;
        let context = JobContext {
            job_id,
            job,
            transcoder: Arc::clone(&self.transcoder),
            executor: Arc::clone(&self.executor),
            observer,
            parser: ProgressParser::new(self.profile.progress_marker.clone()),
            slot: Arc::clone(&self.slot),
            token: token.clone(),
        };
        let task = runtime.spawn(context.run());

        Ok(JobHandle {
            job_id,
            token,
            task,
        })
    }

    /// Request cancellation of the running job. Returns false when idle.
    pub fn cancel(&self) -> bool {
        match self.lock_slot() {
            Ok(slot) if slot.state == JobState::Running => match &slot.cancel {
                Some(token) => {
                    info!(job_id = slot.job_id, "Cancellation requested");
                    token.cancel();
                    true
                }
                None => false,
            },
            _ => false,
        }
    }

    fn lock_slot(&self) -> Result<MutexGuard<'_, RunnerSlot>, DomainError> {
        self.slot
            .lock()
            .map_err(|_| DomainError::InternalError("runner slot lock poisoned".to_string()))
    }
}

/// Caller-side handle on a started job
#[derive(Debug)]
pub struct JobHandle {
    job_id: u64,
    token: CancellationToken,
    task: JoinHandle<CompletionReport>,
}

impl JobHandle {
    pub fn id(&self) -> u64 {
        self.job_id
    }

    /// Request cancellation of this job
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the background unit to finish. By the time this resolves
    /// the completion callback has been posted. Do not call again after it
    /// has returned.
    pub async fn join(&mut self) -> Result<CompletionReport, DomainError> {
        (&mut self.task)
            .await
            .map_err(|e| DomainError::InternalError(format!("job task failed: {}", e)))
    }
}

enum Step {
    Cancelled,
    Line(String),
    Closed,
}

struct JobContext {
    job_id: u64,
    job: TranscodeJob,
    transcoder: Arc<dyn TranscodePort>,
    executor: Arc<dyn CallbackExecutor>,
    observer: Weak<dyn JobObserver>,
    parser: ProgressParser,
    slot: Arc<Mutex<RunnerSlot>>,
    token: CancellationToken,
}

#[derive(Default)]
struct Tally {
    last_percent: Option<ProgressPercent>,
    updates: u64,
    last_message: Option<String>,
}

impl JobContext {
    async fn run(self) -> CompletionReport {
        let started = Instant::now();
        let guard = SlotGuard {
            slot: Arc::clone(&self.slot),
            job_id: self.job_id,
            state: JobState::Failed,
        };
        let mut tally = Tally::default();

        let outcome = match self.transcoder.launch(self.job.arguments()).await {
            Ok(process) => self.drive(process, &mut tally).await,
            Err(e) => {
                warn!(job_id = self.job_id, error = %e, "Transcoder could not be launched");
                JobOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        };

        let report = CompletionReport {
            job_id: self.job_id,
            outcome,
            output_path: self.job.output_path().to_path_buf(),
            last_percent: tally.last_percent,
            progress_updates: tally.updates,
            elapsed: started.elapsed(),
        };

        guard.settle(report.outcome.state());
        info!(
            job_id = self.job_id,
            outcome = %report.outcome,
            updates = report.progress_updates,
            "Transcode job finished"
        );

        let observer = self.observer.clone();
        let delivered = report.clone();
        self.executor.post(Box::new(move || {
            if let Some(observer) = observer.upgrade() {
                observer.on_complete(&delivered);
            }
        }));

        report
    }

    async fn drive(&self, mut process: Box<dyn TranscodeProcess>, tally: &mut Tally) -> JobOutcome {
        let tracker = ProgressTracker::new(self.job.total_duration_ms());
        let mut cancelled = false;

        loop {
            let step = tokio::select! {
                biased;
                _ = self.token.cancelled() => Step::Cancelled,
                line = process.next_line() => match line {
                    Ok(Some(line)) => Step::Line(line),
                    Ok(None) => Step::Closed,
                    Err(e) => {
                        warn!(job_id = self.job_id, error = %e, "Stopped reading transcoder output");
                        Step::Closed
                    }
                },
            };

            match step {
                Step::Line(line) => self.handle_line(&line, &tracker, tally),
                Step::Closed => break,
                Step::Cancelled => {
                    cancelled = true;
                    if let Err(e) = process.terminate().await {
                        warn!(job_id = self.job_id, error = %e, "Failed to terminate transcoder");
                    }
                    break;
                }
            }
        }

        let result = process.wait().await;
        if cancelled {
            return JobOutcome::Cancelled;
        }

        match result {
            Ok(EngineResult::Success) => JobOutcome::Succeeded,
            Ok(EngineResult::Cancelled) => JobOutcome::Cancelled,
            Ok(EngineResult::Error) => JobOutcome::Failed {
                reason: match tally.last_message.take() {
                    Some(message) => format!("transcoder reported an error: {}", message),
                    None => "transcoder reported an error".to_string(),
                },
            },
            Err(e) => JobOutcome::Failed {
                reason: e.to_string(),
            },
        }
    }

    fn handle_line(&self, line: &str, tracker: &ProgressTracker, tally: &mut Tally) {
        let percent = self
            .parser
            .parse(line)
            .and_then(|sample| tracker.percent_for(sample));

        let Some(percent) = percent else {
            trace!(job_id = self.job_id, line, "No progress in line");
            let trimmed = line.trim();
            if !trimmed.is_empty() {
                tally.last_message = Some(trimmed.to_string());
            }
            return;
        };

        debug!(job_id = self.job_id, percent = percent.value(), "Progress");
        tally.last_percent = Some(percent);
        tally.updates += 1;

        let observer = self.observer.clone();
        self.executor.post(Box::new(move || {
            if let Some(observer) = observer.upgrade() {
                observer.on_progress(percent);
            }
        }));
    }
}

/// Releases the runner slot when dropped. A task that unwinds before
/// settling (a panicking observer, say) leaves the slot `Failed`, never
/// `Running`.
struct SlotGuard {
    slot: Arc<Mutex<RunnerSlot>>,
    job_id: u64,
    state: JobState,
}

impl SlotGuard {
    fn settle(mut self, state: JobState) {
        self.state = state;
    }
}

impl Drop for SlotGuard {
    fn drop(&mut self) {
        match self.slot.lock() {
            Ok(mut slot) if slot.job_id == self.job_id => {
                slot.state = self.state;
                slot.cancel = None;
            }
            Ok(_) => {}
            Err(_) => warn!(job_id = self.job_id, "Runner slot lock poisoned while settling"),
        }
    }
}
