//! Resilient feed listener.
//!
//! [`NotificationListener`] owns the hub's single dedicated feed
//! connection. Acquisition happens on a background task spawned at
//! construction, so constructing a hub never blocks on the database and
//! never fails because the feed is down. When the connection errors, the
//! task drops it and retries with exponential backoff, indefinitely.
//! Reconnection never touches client state: registered clients and their
//! subscriptions ride out feed outages untouched.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::task::JoinHandle;

use super::provider::FeedProvider;
use crate::hub::Broadcaster;

/// Reconnect backoff bounds. Delay doubles after every failed attempt,
/// capped at `max`, and resets after a successful connect. Equal bounds
/// give a fixed interval.
#[derive(Debug, Clone, Copy)]
pub struct BackoffConfig {
    /// Delay before the first retry.
    pub initial: Duration,
    /// Upper bound for the doubled delay.
    pub max: Duration,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            initial: Duration::from_millis(500),
            max: Duration::from_secs(30),
        }
    }
}

/// Background task holding the feed subscription and driving fan-out.
#[derive(Debug)]
pub struct NotificationListener {
    connected: Arc<AtomicBool>,
    task: JoinHandle<()>,
}

impl NotificationListener {
    /// Spawns the feed loop and returns immediately.
    #[must_use]
    pub fn spawn(
        provider: Arc<dyn FeedProvider>,
        broadcaster: Broadcaster,
        backoff: BackoffConfig,
    ) -> Self {
        let connected = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&connected);
        let task = tokio::spawn(async move {
            run_feed_loop(provider, broadcaster, backoff, flag).await;
        });
        Self { connected, task }
    }

    /// Returns `true` only while a live feed connection is held.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// Stops the feed loop. Safe to call repeatedly, including before the
    /// initial connection has resolved.
    pub fn shutdown(&self) {
        self.task.abort();
        self.connected.store(false, Ordering::SeqCst);
    }
}

impl Drop for NotificationListener {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Connect, drain notifications into the broadcaster, and reconnect with
/// backoff on any failure. Runs until the owning listener aborts it.
async fn run_feed_loop(
    provider: Arc<dyn FeedProvider>,
    broadcaster: Broadcaster,
    backoff: BackoffConfig,
    connected: Arc<AtomicBool>,
) {
    let mut delay = backoff.initial;
    loop {
        match provider.connect().await {
            Ok(mut connection) => {
                connected.store(true, Ordering::SeqCst);
                delay = backoff.initial;
                tracing::info!("feed connection established");

                loop {
                    match connection.recv().await {
                        Ok(notification) => broadcaster.dispatch(&notification).await,
                        Err(error) => {
                            tracing::warn!(%error, "feed connection lost");
                            break;
                        }
                    }
                }
                connected.store(false, Ordering::SeqCst);
            }
            Err(error) => {
                tracing::warn!(%error, retry_in_ms = delay.as_millis() as u64, "feed connect failed");
            }
        }

        tokio::time::sleep(delay).await;
        delay = delay.saturating_mul(2).min(backoff.max);
    }
}
