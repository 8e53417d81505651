//! Client model.
//!
//! A client is one remote socket bound to one browser session. The two kinds
//! differ only in what gets pushed at them: viewers receive screencast frames
//! and lifecycle events, API clients receive nothing unsolicited and interact
//! purely through request/reply.
//!
//! A handle carries no reference back to its session; the registry owns the
//! socket-to-token mapping, and the session only keeps the handle's event
//! sink. Dropping the handle everywhere closes the sink, nothing else.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::protocol::ServerEvent;

/// Stable identifier of a client socket, assigned by the transport layer.
pub type ClientId = String;

/// Sending side of a client's event channel.
pub type EventSink = mpsc::UnboundedSender<ServerEvent>;

/// What kind of client a socket is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientKind {
    /// Receives the screencast and lifecycle events, drives input.
    Viewer,
    /// Structured request/reply only.
    Api,
}

/// A live client attached to a session.
#[derive(Debug, Clone)]
pub struct ClientHandle {
    /// Socket identifier.
    pub id: ClientId,
    /// Client kind.
    pub kind: ClientKind,
    /// Where pushed events go.
    pub sink: EventSink,
}

impl ClientHandle {
    /// Create a handle for a socket.
    pub fn new(id: impl Into<ClientId>, kind: ClientKind, sink: EventSink) -> Self {
        Self {
            id: id.into(),
            kind,
            sink,
        }
    }

    /// Whether this client receives pushed events.
    pub fn is_viewer(&self) -> bool {
        self.kind == ClientKind::Viewer
    }

    /// Push an event to the client.
    ///
    /// A gone receiver is not an error; the registry will detach the client
    /// when the transport reports the disconnect.
    pub fn send(&self, event: ServerEvent) {
        let _ = self.sink.send(event);
    }
}
