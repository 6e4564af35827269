//! Rotating loading messages shown while a request is pending.
//!
//! [`LoadingCycle`] is the pure rotation. [`LoadingTicker`] drives it on a
//! timer from a spawned task and owns that task: stopping or dropping the
//! ticker cancels it, so nothing keeps writing to a hidden indicator.

use crate::config::default_messages;
use crate::view::View;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::debug;

/// An ordered, non-empty list of messages and a cursor into it.
#[derive(Debug, Clone)]
pub struct LoadingCycle {
    messages: Vec<String>,
    index: usize,
}

impl LoadingCycle {
    /// Create a cycle positioned at the first message. An empty list is
    /// replaced by the default messages.
    pub fn new(messages: Vec<String>) -> Self {
        let messages = if messages.is_empty() {
            default_messages()
        } else {
            messages
        };
        Self { messages, index: 0 }
    }

    pub fn current(&self) -> &str {
        self.message_at(self.index)
    }

    /// Move to the next message, wrapping around, and return it.
    pub fn advance(&mut self) -> &str {
        self.index = (self.index + 1) % self.messages.len();
        self.current()
    }

    /// The message displayed after `ticks` intervals.
    pub fn message_at(&self, ticks: usize) -> &str {
        &self.messages[ticks % self.messages.len()]
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }
}

/// Handle to the task that rotates the loading label.
pub struct LoadingTicker {
    handle: Option<JoinHandle<()>>,
}

impl LoadingTicker {
    /// Show the cycle's first message right away and start rotating every
    /// `interval`.
    ///
    /// When `live` is given, statuses received on it are displayed as they
    /// arrive and the canned rotation stops after the first one.
    pub fn start(
        view: Arc<dyn View>,
        mut cycle: LoadingCycle,
        interval: Duration,
        live: Option<UnboundedReceiver<String>>,
    ) -> Self {
        view.set_loading_message(cycle.current());
        debug!(
            "Loading indicator started ({} messages, every {:?})",
            cycle.len(),
            interval
        );

        let first_tick = Instant::now() + interval;
        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(first_tick, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            let mut live = live;
            let mut live_mode = false;

            loop {
                tokio::select! {
                    _ = ticker.tick(), if !live_mode => {
                        view.set_loading_message(cycle.advance());
                    }
                    status = next_status(&mut live) => match status {
                        Some(status) => {
                            if !live_mode {
                                debug!("Switching loading indicator to live status");
                            }
                            live_mode = true;
                            view.set_loading_message(&status);
                        }
                        None => live = None,
                    }
                }
            }
        });

        Self {
            handle: Some(handle),
        }
    }

    /// Cancel the rotation and wait until the task is gone.
    pub async fn stop(mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            let _ = handle.await;
        }
    }
}

impl Drop for LoadingTicker {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

/// Next live status, or pending forever once there is no channel.
async fn next_status(live: &mut Option<UnboundedReceiver<String>>) -> Option<String> {
    match live {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}
