//! Gateway error types.
//!
//! The hub has no user-visible error surface beyond its documented reply
//! frames: malformed input is dropped, operations on unknown clients are
//! no-ops, and per-client transport failures are isolated and logged. The
//! types here exist so those failures can be propagated *internally*,
//! between the transport, the hub, and the feed loop, without panicking.

/// Errors raised by a transport-owned socket handle.
#[derive(Debug, thiserror::Error)]
pub enum SocketError {
    /// The transport side of the connection has gone away; queued frames
    /// can no longer be delivered.
    #[error("socket closed")]
    Closed,
}

/// Errors raised by the notification feed.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// Database-level failure while connecting to or reading from the
    /// `LISTEN` channels.
    #[error("feed connection error: {0}")]
    Connection(#[from] sqlx::Error),

    /// The provider could not supply a connection.
    #[error("feed unavailable: {0}")]
    Unavailable(String),
}
