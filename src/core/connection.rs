//! # Connection State Machine
//!
//! Lifecycle of the single room WebSocket. Pure: the transport task reports
//! what happened and the machine decides whether it matters.
//!
//! ```text
//! ┌────────┐ connect() ┌────────────┐  Opened  ┌──────┐
//! │ Closed │──────────▶│ Connecting │─────────▶│ Open │
//! └────────┘           └────────────┘          └──────┘
//!      ▲                     │ Closed/Failed       │ Closed/Failed/teardown
//!      └─────────────────────┴─────────────────────┘
//! ```
//!
//! Every connection gets a fresh [`ConnectionId`]. Events carry the id of the
//! socket they came from, so anything reported by a socket that has since
//! been replaced is [`Transition::Ignored`].

use std::fmt;

use crate::core::config::ConfigError;

/// Identity of one transport instance. Monotonically increasing per client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(pub u64);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Closed,
    Connecting,
    Open,
}

impl ConnectionState {
    pub fn label(self) -> &'static str {
        match self {
            ConnectionState::Closed => "disconnected",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Open => "connected",
        }
    }
}

/// What the transport reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    Opened,
    Closed,
    Failed(String),
}

/// Outcome of feeding a [`TransportEvent`] to the machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// CONNECTING → OPEN. The caller flushes the outbound queue.
    Opened,
    /// Peer or transport closed the socket.
    Closed,
    /// Transport error; the socket is gone.
    Failed(String),
    /// Stale or redundant event, nothing changed.
    Ignored,
}

#[derive(Debug, Clone)]
pub struct Connection {
    id: ConnectionId,
    room_id: String,
    url: String,
    state: ConnectionState,
}

impl Connection {
    /// A connection that has just been requested.
    pub fn new(id: ConnectionId, room_id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id,
            room_id: room_id.into(),
            url: url.into(),
            state: ConnectionState::Connecting,
        }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn room_id(&self) -> &str {
        &self.room_id
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == ConnectionState::Open
    }

    /// Apply an event reported by connection `from`.
    pub fn handle(&mut self, from: ConnectionId, event: TransportEvent) -> Transition {
        if from != self.id {
            return Transition::Ignored;
        }
        match (self.state, event) {
            (ConnectionState::Connecting, TransportEvent::Opened) => {
                self.state = ConnectionState::Open;
                Transition::Opened
            }
            (ConnectionState::Closed, _) | (_, TransportEvent::Opened) => Transition::Ignored,
            (_, TransportEvent::Closed) => {
                self.state = ConnectionState::Closed;
                Transition::Closed
            }
            (_, TransportEvent::Failed(reason)) => {
                self.state = ConnectionState::Closed;
                Transition::Failed(reason)
            }
        }
    }

    /// Explicit local close before a new `connect()`.
    pub fn teardown(&mut self) {
        self.state = ConnectionState::Closed;
    }
}

/// Derive the room endpoint from the server origin.
///
/// The WebSocket scheme mirrors the origin (`https` → `wss`, anything else
/// → `ws`); only the host part of the origin is kept.
pub fn endpoint_url(origin: &str, room_id: &str) -> Result<String, ConfigError> {
    let (scheme, rest) = origin
        .trim()
        .split_once("://")
        .ok_or_else(|| ConfigError::InvalidOrigin(origin.to_string()))?;

    let ws_scheme = match scheme.to_ascii_lowercase().as_str() {
        "https" | "wss" => "wss",
        "http" | "ws" => "ws",
        _ => return Err(ConfigError::InvalidOrigin(origin.to_string())),
    };

    let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
    if host.is_empty() {
        return Err(ConfigError::InvalidOrigin(origin.to_string()));
    }

    Ok(format!("{ws_scheme}://{host}/ws/chat/{room_id}"))
}
