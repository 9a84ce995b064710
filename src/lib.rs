//! CropX Library
//!
//! Drives an external `ffmpeg` process to crop a video, turns its textual
//! progress output into a bounded percentage, and delivers progress and a
//! single completion notification to an observer on a caller-chosen
//! context.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config_initialization;
pub mod domain;
pub mod engine;
pub mod error;
pub mod ports;

// Re-export commonly used types
pub use domain::config::AppConfig;
pub use domain::errors::DomainError;
pub use domain::model::{
    CompletionReport, CropRect, CropRequest, EngineResult, JobOutcome, JobState, ProgressPercent,
    ProgressSample, TranscodeJob, TranscodeProfile,
};
pub use engine::{JobHandle, JobObserver, JobRunner, ProgressParser, ProgressTracker};
pub use error::{CropError, CropResult};
