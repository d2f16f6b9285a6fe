//! Shared fakes for hub unit tests.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::socket::ClientSocket;
use crate::error::SocketError;

/// In-memory [`ClientSocket`] that records every frame and close request.
/// Failure and hang behavior are switchable per instance.
#[derive(Debug, Default)]
pub(crate) struct RecordingSocket {
    frames: Mutex<Vec<String>>,
    closes: AtomicUsize,
    fail_send: bool,
    fail_close: bool,
    hang_close: bool,
}

impl RecordingSocket {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Socket whose `send` always reports the connection as closed.
    pub(crate) fn failing_send() -> Arc<Self> {
        Arc::new(Self {
            fail_send: true,
            ..Self::default()
        })
    }

    /// Socket whose `close` always fails.
    pub(crate) fn failing_close() -> Arc<Self> {
        Arc::new(Self {
            fail_close: true,
            ..Self::default()
        })
    }

    /// Socket whose `close` never resolves.
    pub(crate) fn hanging_close() -> Arc<Self> {
        Arc::new(Self {
            hang_close: true,
            ..Self::default()
        })
    }

    pub(crate) fn sent(&self) -> Vec<String> {
        self.frames.lock().map(|f| f.clone()).unwrap_or_default()
    }

    pub(crate) fn close_count(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ClientSocket for RecordingSocket {
    fn send(&self, frame: &str) -> Result<(), SocketError> {
        if self.fail_send {
            return Err(SocketError::Closed);
        }
        if let Ok(mut frames) = self.frames.lock() {
            frames.push(frame.to_owned());
        }
        Ok(())
    }

    async fn close(&self) -> Result<(), SocketError> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        if self.hang_close {
            std::future::pending::<()>().await;
        }
        if self.fail_close {
            return Err(SocketError::Closed);
        }
        Ok(())
    }
}
