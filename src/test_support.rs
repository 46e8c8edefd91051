//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::time::Duration;

use crate::core::action::{Action, Effect, update};
use crate::core::connection::ConnectionId;
use crate::core::protocol::ClientFrame;
use crate::core::state::App;

/// Creates a test App for local user "alice" against a plain-http origin.
pub fn test_app() -> App {
    App::new(
        "alice".to_string(),
        "http://localhost:8000".to_string(),
        Duration::from_millis(2000),
    )
}

/// A test App that has requested a connection to `room` which has not
/// opened yet.
pub fn joined_app(room: &str) -> (App, ConnectionId) {
    let mut app = test_app();
    let effects = update(&mut app, Action::JoinRoom(room.to_string()));
    let id = effects
        .iter()
        .find_map(|e| match e {
            Effect::OpenTransport { connection, .. } => Some(*connection),
            _ => None,
        })
        .expect("join should open a transport");
    (app, id)
}

/// A test App with an open connection to `room`.
pub fn open_app(room: &str) -> (App, ConnectionId) {
    let (mut app, id) = joined_app(room);
    update(&mut app, Action::TransportOpened(id));
    (app, id)
}

/// Contents of every chat frame in `effects`, in order.
pub fn sent_chat_frames(effects: &[Effect]) -> Vec<String> {
    effects
        .iter()
        .filter_map(|e| match e {
            Effect::Send {
                frame: ClientFrame::Chat { content, .. },
                ..
            } => Some(content.clone()),
            _ => None,
        })
        .collect()
}
