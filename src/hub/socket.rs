//! Transport-owned socket handles.
//!
//! The hub never touches a WebSocket directly. The transport hands it a
//! [`ClientSocket`] whose `send` enqueues a frame on the connection's
//! outbound queue without blocking, so a slow or dead client can never
//! stall registry operations or a broadcast pass.

use async_trait::async_trait;

use crate::error::SocketError;

/// Handle to one client connection, owned by the transport layer.
///
/// `send` must be non-blocking: implementations enqueue the frame and let
/// the transport's writer task drain the queue. `close` asks the transport
/// to tear the connection down; it resolves once the request has been
/// accepted, not once the TCP stream is gone.
#[async_trait]
pub trait ClientSocket: Send + Sync + std::fmt::Debug {
    /// Queues a text frame for delivery.
    ///
    /// # Errors
    ///
    /// Returns [`SocketError::Closed`] if the transport side of the
    /// connection has already gone away.
    fn send(&self, frame: &str) -> Result<(), SocketError>;

    /// Requests that the transport close the connection.
    ///
    /// # Errors
    ///
    /// Returns [`SocketError::Closed`] if the connection is already gone.
    async fn close(&self) -> Result<(), SocketError>;
}
