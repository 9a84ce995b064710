//! Callback delivery contexts
//!
//! The runner never calls an observer from its background task directly.
//! Every notification is wrapped in a closure and posted to a
//! [`CallbackExecutor`]; the executor decides where the closure runs.

use std::fmt;

use tokio::sync::mpsc;
use tracing::warn;

/// Deferred observer notification
pub type Callback = Box<dyn FnOnce() + Send + 'static>;

/// Context that runs observer callbacks. Implementations must preserve
/// posting order.
pub trait CallbackExecutor: Send + Sync {
    fn post(&self, callback: Callback);
}

/// Runs callbacks immediately on the posting task
#[derive(Debug, Default, Clone, Copy)]
pub struct InlineExecutor;

impl CallbackExecutor for InlineExecutor {
    fn post(&self, callback: Callback) {
        callback();
    }
}

/// Posts callbacks to a [`CallbackQueue`] drained by the foreground
#[derive(Clone)]
pub struct ChannelExecutor {
    sender: mpsc::UnboundedSender<Callback>,
}

impl ChannelExecutor {
    /// Create an executor together with the queue that must be drained
    pub fn new() -> (Self, CallbackQueue) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, CallbackQueue { receiver })
    }
}

impl fmt::Debug for ChannelExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChannelExecutor")
            .field("closed", &self.sender.is_closed())
            .finish()
    }
}

impl CallbackExecutor for ChannelExecutor {
    fn post(&self, callback: Callback) {
        if self.sender.send(callback).is_err() {
            warn!("Callback queue dropped, notification discarded");
        }
    }
}

/// Foreground end of a [`ChannelExecutor`]
pub struct CallbackQueue {
    receiver: mpsc::UnboundedReceiver<Callback>,
}

impl CallbackQueue {
    /// Wait for the next posted callback without running it
    pub async fn next(&mut self) -> Option<Callback> {
        self.receiver.recv().await
    }

    /// Run every callback that is already queued, returning how many ran
    pub fn run_pending(&mut self) -> usize {
        let mut ran = 0;
        while let Ok(callback) = self.receiver.try_recv() {
            callback();
            ran += 1;
        }
        ran
    }
}

impl fmt::Debug for CallbackQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackQueue").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_inline_executor_runs_immediately() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        InlineExecutor.post(Box::new(move || sink.lock().unwrap().push(1)));
        assert_eq!(*seen.lock().unwrap(), vec![1]);
    }

    #[test]
    fn test_channel_executor_defers_until_drained() {
        let (executor, mut queue) = ChannelExecutor::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        for i in 0..5 {
            let sink = Arc::clone(&seen);
            executor.post(Box::new(move || sink.lock().unwrap().push(i)));
        }
        assert!(seen.lock().unwrap().is_empty());

        assert_eq!(queue.run_pending(), 5);
        assert_eq!(*seen.lock().unwrap(), vec![0, 1, 2, 3, 4]);
        assert_eq!(queue.run_pending(), 0);
    }

    #[tokio::test]
    async fn test_channel_queue_next_yields_in_order() {
        let (executor, mut queue) = ChannelExecutor::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        for i in 0..3 {
            let sink = Arc::clone(&seen);
            executor.post(Box::new(move || sink.lock().unwrap().push(i)));
        }
        drop(executor);

        while let Some(callback) = queue.next().await {
            callback();
        }
        assert_eq!(*seen.lock().unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn test_post_after_queue_dropped_does_not_panic() {
        let (executor, queue) = ChannelExecutor::new();
        drop(queue);
        executor.post(Box::new(|| {}));
    }
}
