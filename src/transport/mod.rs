//! # Transport
//!
//! The room WebSocket, run as a background tokio task. The task reports
//! everything it sees as [`Action`]s on the same channel the UI loop drains;
//! the UI loop hands it outbound frames through a [`TransportHandle`].
//!
//! ```text
//!  UI loop ── ClientFrame (tokio mpsc) ──▶ ┌───────────┐ ── text ──▶ server
//!     ▲                                    │ ws task   │
//!     └──── Action (std mpsc) ──────────── └───────────┘ ◀── text ── server
//! ```
//!
//! Dropping or closing the handle ends the task and closes the socket. The
//! task never reconnects on its own.

mod ws;

use std::fmt;
use std::sync::mpsc;

use log::debug;
use tokio::sync::mpsc::UnboundedSender;
use tokio_tungstenite::tungstenite;

use crate::core::action::Action;
use crate::core::connection::ConnectionId;
use crate::core::protocol::ClientFrame;

/// The UI side of one running transport task.
pub struct TransportHandle {
    connection: ConnectionId,
    outbound: UnboundedSender<ClientFrame>,
}

impl TransportHandle {
    pub fn connection(&self) -> ConnectionId {
        self.connection
    }

    /// Queue a frame for the socket writer.
    pub fn send(&self, frame: ClientFrame) -> Result<(), TransportError> {
        self.outbound
            .send(frame)
            .map_err(|_| TransportError::Closed)
    }

    /// Close the socket. Events the task reports afterwards carry a stale
    /// connection id and are ignored by the reducer.
    pub fn close(self) {
        debug!("Closing transport {}", self.connection);
        drop(self.outbound);
    }
}

/// Connect to `url` in the background and report through `actions`.
pub fn spawn(connection: ConnectionId, url: String, actions: mpsc::Sender<Action>) -> TransportHandle {
    let (outbound, outbound_rx) = tokio::sync::mpsc::unbounded_channel();
    tokio::spawn(ws::run(connection, url, outbound_rx, actions));
    TransportHandle {
        connection,
        outbound,
    }
}

#[derive(Debug)]
pub enum TransportError {
    Connect(tungstenite::Error),
    Send(tungstenite::Error),
    Receive(tungstenite::Error),
    /// The socket task is gone.
    Closed,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Connect(e) => write!(f, "connect failed: {e}"),
            TransportError::Send(e) => write!(f, "send failed: {e}"),
            TransportError::Receive(e) => write!(f, "receive failed: {e}"),
            TransportError::Closed => write!(f, "transport is closed"),
        }
    }
}

impl std::error::Error for TransportError {}
