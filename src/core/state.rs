//! # Application State
//!
//! Core business state for the chat client. This module contains domain
//! logic only - no TUI-specific types. Presentation state lives in the
//! `tui` module.
//!
//! ```text
//! App
//! ├── username: String               // local identity
//! ├── server_origin: String          // http(s)://host the rooms live on
//! ├── typing_idle: Duration          // idle gap that ends a typing burst
//! ├── session: Option<RoomSession>   // current room, None before /join
//! ├── notice: Option<String>         // blocking server error notice
//! └── status_message: String         // status bar text
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.
//! This keeps things predictable, so no surprise mutations.

use std::time::Duration;

use crate::core::config::ResolvedConfig;
use crate::core::connection::ConnectionId;
use crate::core::session::RoomSession;

pub struct App {
    pub username: String,
    pub server_origin: String,
    pub typing_idle: Duration,
    pub session: Option<RoomSession>,
    /// Server-reported error; input is blocked until dismissed.
    pub notice: Option<String>,
    pub status_message: String,
    next_connection_id: u64,
    next_typing_generation: u64,
}

impl App {
    pub fn new(username: String, server_origin: String, typing_idle: Duration) -> Self {
        Self {
            username,
            server_origin,
            typing_idle,
            session: None,
            notice: None,
            status_message: String::from("Type /join <room> to enter a room"),
            next_connection_id: 0,
            next_typing_generation: 0,
        }
    }

    pub fn from_config(config: &ResolvedConfig) -> Self {
        Self::new(
            config.username.clone(),
            config.server_origin.clone(),
            config.typing_idle,
        )
    }

    /// Hand out a fresh id; ids are never reused within a run.
    pub fn allocate_connection_id(&mut self) -> ConnectionId {
        self.next_connection_id += 1;
        ConnectionId(self.next_connection_id)
    }

    /// Generation for the next typing idle timer. Shared by every session,
    /// so a timer queued by a previous room can never match a new one.
    pub fn allocate_typing_generation(&mut self) -> u64 {
        self.next_typing_generation += 1;
        self.next_typing_generation
    }

    pub fn room_id(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.room_id.as_str())
    }
}
