//! # Room Session
//!
//! Everything bound to the room the user is currently in. Switching rooms
//! replaces the whole session; reconnecting to the same room keeps it.
//!
//! ```text
//! RoomSession
//! ├── room_id: String
//! ├── connection: Option<Connection>   // None = disconnected
//! ├── typing: TypingTracker            // local presence
//! ├── queue: OutboundQueue             // queued + in-flight sends
//! ├── view: MessageView                // rendered entries
//! └── typing_line: Option<String>      // remote presence, None = hidden
//! ```

use std::time::Duration;

use crate::core::connection::{Connection, ConnectionId, ConnectionState};
use crate::core::message::Message;
use crate::core::queue::OutboundQueue;
use crate::core::renderer::{Entry, MessageView};
use crate::core::typing::TypingTracker;

#[derive(Debug)]
pub struct RoomSession {
    pub room_id: String,
    pub connection: Option<Connection>,
    pub typing: TypingTracker,
    pub queue: OutboundQueue,
    pub view: MessageView,
    pub typing_line: Option<String>,
}

impl RoomSession {
    pub fn new(room_id: impl Into<String>, local_user: &str, typing_idle: Duration) -> Self {
        Self {
            room_id: room_id.into(),
            connection: None,
            typing: TypingTracker::new(typing_idle),
            queue: OutboundQueue::new(),
            view: MessageView::new(local_user),
            typing_line: None,
        }
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.connection
            .as_ref()
            .map_or(ConnectionState::Closed, Connection::state)
    }

    /// Id of the connection frames can be sent on right now.
    pub fn open_connection(&self) -> Option<ConnectionId> {
        self.connection
            .as_ref()
            .filter(|c| c.is_open())
            .map(Connection::id)
    }

    /// Whether `id` is the session's live connection.
    pub fn is_current(&self, id: ConnectionId) -> bool {
        self.connection.as_ref().is_some_and(|c| c.id() == id)
    }

    /// Re-render every unconfirmed message as pending, after the view has
    /// been cleared by an open or a history snapshot.
    pub fn restore_unconfirmed(&mut self, local_user: &str) {
        let unconfirmed: Vec<Message> = self
            .queue
            .in_flight()
            .chain(self.queue.queued())
            .map(|p| Message::pending(p.temp_id.clone(), local_user.to_string(), p.content.clone()))
            .collect();
        for message in unconfirmed {
            self.view.render(Entry::Chat(message));
        }
    }
}
