//! # Core Application Logic
//!
//! This module contains the chat client's business logic.
//! It knows nothing about sockets, timers or terminals.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • State (app data)     │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │                         │
//!                    │  No I/O. No UI. Pure.   │
//!                    └───────────┬─────────────┘
//!                                │ Effects
//!            ┌───────────────────┴───────────────────┐
//!            ▼                                       ▼
//!     ┌────────────┐                          ┌────────────┐
//!     │    TUI     │◀──── Actions (mpsc) ─────│ Transport  │
//!     │  Adapter   │                          │ (tungste-  │
//!     │ (ratatui)  │                          │   nite)    │
//!     └────────────┘                          └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: The `App` struct, all application state in one place
//! - [`action`]: The `Action` enum and the `update()` reducer
//! - [`session`]: Per-room state, replaced on room switch
//! - [`connection`]: Connection lifecycle and endpoint derivation
//! - [`queue`]: Messages waiting for (or awaiting confirmation from) the server
//! - [`renderer`]: Message view model with correlation-keyed entries
//! - [`typing`]: Local typing debounce and the remote presence line
//! - [`protocol`]: JSON frames on the wire
//! - [`message`]: Chat message records and timestamps
//! - [`config`]: Settings and their override hierarchy

pub mod action;
pub mod config;
pub mod connection;
pub mod message;
pub mod protocol;
pub mod queue;
pub mod renderer;
pub mod session;
pub mod state;
pub mod typing;
