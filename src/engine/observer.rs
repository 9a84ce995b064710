//! Job observers for UI integration

use std::io::Write;

use crate::domain::model::{CompletionReport, JobOutcome, ProgressPercent};

/// Receives notifications for one job. Runners hold observers weakly, so an
/// observer that has been dropped simply stops receiving calls.
pub trait JobObserver: Send + Sync {
    /// Called once per parsed progress sample, in output order
    fn on_progress(&self, percent: ProgressPercent);

    /// Called exactly once, after the last progress call
    fn on_complete(&self, report: &CompletionReport);
}

/// Observer built from a pair of closures
pub struct FnObserver<P, C>
where
    P: Fn(ProgressPercent) + Send + Sync,
    C: Fn(&CompletionReport) + Send + Sync,
{
    on_progress: P,
    on_complete: C,
}

impl<P, C> FnObserver<P, C>
where
    P: Fn(ProgressPercent) + Send + Sync,
    C: Fn(&CompletionReport) + Send + Sync,
{
    pub fn new(on_progress: P, on_complete: C) -> Self {
        Self {
            on_progress,
            on_complete,
        }
    }
}

impl<P, C> JobObserver for FnObserver<P, C>
where
    P: Fn(ProgressPercent) + Send + Sync,
    C: Fn(&CompletionReport) + Send + Sync,
{
    fn on_progress(&self, percent: ProgressPercent) {
        (self.on_progress)(percent)
    }

    fn on_complete(&self, report: &CompletionReport) {
        (self.on_complete)(report)
    }
}

/// Console progress bar for CLI usage
pub struct ConsoleObserver {
    bar_length: usize,
}

impl ConsoleObserver {
    pub fn new() -> Self {
        Self { bar_length: 30 }
    }

    fn render_bar(&self, percent: ProgressPercent) -> String {
        let filled = usize::from(percent.value()) * self.bar_length / 100;
        format!(
            "[{}{}] {:>3}%",
            "#".repeat(filled),
            "-".repeat(self.bar_length - filled),
            percent.value()
        )
    }
}

impl Default for ConsoleObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl JobObserver for ConsoleObserver {
    fn on_progress(&self, percent: ProgressPercent) {
        let mut stdout = std::io::stdout().lock();
        let _ = write!(stdout, "\r{}", self.render_bar(percent));
        let _ = stdout.flush();
    }

    fn on_complete(&self, report: &CompletionReport) {
        let mut stdout = std::io::stdout().lock();
        if report.progress_updates > 0 {
            let _ = writeln!(stdout);
        }
        let _ = match &report.outcome {
            JobOutcome::Succeeded => writeln!(
                stdout,
                "Crop finished in {:.1}s: {}",
                report.elapsed.as_secs_f64(),
                report.output_path.display()
            ),
            JobOutcome::Cancelled => writeln!(stdout, "Crop cancelled"),
            JobOutcome::Failed { reason } => writeln!(stdout, "Crop failed: {}", reason),
        };
    }
}

/// JSON-lines observer for structured output
pub struct JsonObserver;

impl JsonObserver {
    fn progress_event(percent: ProgressPercent) -> serde_json::Value {
        serde_json::json!({
            "event": "progress",
            "percent": percent,
            "timestamp": chrono::Utc::now().to_rfc3339()
        })
    }

    fn complete_event(report: &CompletionReport) -> serde_json::Value {
        serde_json::json!({
            "event": "complete",
            "report": report,
            "timestamp": chrono::Utc::now().to_rfc3339()
        })
    }
}

impl JobObserver for JsonObserver {
    fn on_progress(&self, percent: ProgressPercent) {
        println!("{}", Self::progress_event(percent));
    }

    fn on_complete(&self, report: &CompletionReport) {
        println!("{}", Self::complete_event(report));
    }
}

/// No-op observer for when progress reporting is disabled
pub struct NoOpObserver;

impl JobObserver for NoOpObserver {
    fn on_progress(&self, _percent: ProgressPercent) {}
    fn on_complete(&self, _report: &CompletionReport) {}
}
