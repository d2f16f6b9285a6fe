//! WebSocket transport layer.
//!
//! The endpoint at `/ws` carries the client control protocol and the
//! broadcast stream. The transport owns each socket: it registers the
//! client with the hub on upgrade, feeds inbound text frames to the hub's
//! router, drains the hub's outbound queue into the socket, and reports
//! the disconnect when the connection ends.

pub mod connection;
pub mod handler;
