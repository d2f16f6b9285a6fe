//! Client control protocol: inbound frames and acknowledgments.
//!
//! Inbound frames are JSON text discriminated by a `type` field. Parsing is
//! a single step: malformed JSON fails to decode, an unrecognized tag
//! lands on [`ControlMessage::Other`], and both route to the router's
//! ignore branch rather than an error path.

use serde::{Deserialize, Serialize};

/// Control frames a client can send over the socket.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ControlMessage {
    /// Add channels to the client's subscription set.
    Subscribe {
        /// Channels to subscribe to. A missing field is treated as empty.
        channels: Option<Vec<String>>,
    },
    /// Remove channels from the client's subscription set.
    Unsubscribe {
        /// Channels to unsubscribe from. A missing field is treated as empty.
        channels: Option<Vec<String>>,
    },
    /// Liveness probe; answered with [`ControlReply::Pong`].
    Ping,
    /// Any other `type` tag. Ignored without a reply.
    #[serde(other)]
    Other,
}

/// Acknowledgment frames sent back to the client.
///
/// The `channels` field echoes the inbound frame verbatim: an explicit
/// empty array comes back as `[]`, an omitted field stays omitted.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ControlReply {
    /// Acknowledges a subscribe.
    Subscribed {
        /// Channels echoed from the request.
        #[serde(skip_serializing_if = "Option::is_none")]
        channels: Option<Vec<String>>,
    },
    /// Acknowledges an unsubscribe.
    Unsubscribed {
        /// Channels echoed from the request.
        #[serde(skip_serializing_if = "Option::is_none")]
        channels: Option<Vec<String>>,
    },
    /// Answer to a ping.
    Pong,
}
