//! Transcode orchestration engine
//!
//! Progress parsing, callback delivery and the single-slot job runner.

pub mod dispatch;
pub mod observer;
pub mod progress;
pub mod runner;

pub use dispatch::{Callback, CallbackExecutor, CallbackQueue, ChannelExecutor, InlineExecutor};
pub use observer::{ConsoleObserver, FnObserver, JobObserver, JsonObserver, NoOpObserver};
pub use progress::{parse_timestamp, ProgressParser, ProgressTracker};
pub use runner::{JobHandle, JobRunner};
