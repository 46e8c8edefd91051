//! # Typing Presence
//!
//! Local side: debounce keystrokes into `start`/`stop` transitions.
//! Remote side: turn the server's list of typing users into one line of text.
//!
//! ```text
//!            keystroke / Start           idle timer / Stop
//!  ┌──────┐ ───────────────────▶ ┌────────┐ ──────────────────▶ ┌──────┐
//!  │ Idle │                      │ Typing │                     │ Idle │
//!  └──────┘ ◀─────────────────── └────────┘                     └──────┘
//!                send / Stop       │    ▲
//!                                  └────┘ keystroke: re-arm timer only
//! ```
//!
//! The tracker is a pure state machine: it returns [`TypingAction`]s and the
//! runtime owns the actual timer. Each armed timer carries a caller-supplied
//! generation so an expiry from a superseded timer is ignored.

use std::time::Duration;

use crate::core::protocol::TypingStatus;

/// Idle gap after the last keystroke that ends a typing burst.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_millis(2000);

/// Work for the runtime after a tracker transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypingAction {
    /// Send a typing frame with this status.
    Emit(TypingStatus),
    /// Cancel the currently armed idle timer.
    CancelIdle,
    /// Arm a single-shot idle timer; report expiry with `generation`.
    ScheduleIdle { generation: u64, after: Duration },
}

#[derive(Debug)]
pub struct TypingTracker {
    is_typing: bool,
    timer_armed: bool,
    generation: u64,
    idle_timeout: Duration,
}

impl Default for TypingTracker {
    fn default() -> Self {
        Self::new(DEFAULT_IDLE_TIMEOUT)
    }
}

impl TypingTracker {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            is_typing: false,
            timer_armed: false,
            generation: 0,
            idle_timeout,
        }
    }

    pub fn is_typing(&self) -> bool {
        self.is_typing
    }

    /// A keystroke in the compose input. The new idle timer is armed with
    /// `generation`, which must differ from every earlier one.
    pub fn keystroke(&mut self, generation: u64) -> Vec<TypingAction> {
        let mut actions = Vec::new();
        if !self.is_typing {
            self.is_typing = true;
            actions.push(TypingAction::Emit(TypingStatus::Start));
        }
        if self.timer_armed {
            actions.push(TypingAction::CancelIdle);
        }
        self.generation = generation;
        self.timer_armed = true;
        actions.push(TypingAction::ScheduleIdle {
            generation: self.generation,
            after: self.idle_timeout,
        });
        actions
    }

    /// The idle timer armed with `generation` fired.
    pub fn idle_elapsed(&mut self, generation: u64) -> Vec<TypingAction> {
        if !self.timer_armed || generation != self.generation {
            return Vec::new();
        }
        self.timer_armed = false;
        if self.is_typing {
            self.is_typing = false;
            vec![TypingAction::Emit(TypingStatus::Stop)]
        } else {
            Vec::new()
        }
    }

    /// A message was submitted; sending ends the typing gesture.
    pub fn message_sent(&mut self) -> Vec<TypingAction> {
        let mut actions = Vec::new();
        if self.is_typing {
            self.is_typing = false;
            actions.push(TypingAction::Emit(TypingStatus::Stop));
        }
        if self.timer_armed {
            self.timer_armed = false;
            actions.push(TypingAction::CancelIdle);
        }
        actions
    }

    /// Forget all state on disconnect. Nothing is emitted: there is no
    /// transport left to carry it.
    pub fn reset(&mut self) -> Vec<TypingAction> {
        self.is_typing = false;
        if self.timer_armed {
            self.timer_armed = false;
            vec![TypingAction::CancelIdle]
        } else {
            Vec::new()
        }
    }
}

/// The presence line for everyone typing except `local_user`.
/// `None` means the indicator is hidden.
pub fn typing_line(users: &[String], local_user: &str) -> Option<String> {
    let others: Vec<&str> = users
        .iter()
        .map(String::as_str)
        .filter(|u| *u != local_user)
        .collect();

    match others.as_slice() {
        [] => None,
        [one] => Some(format!("{one} is typing…")),
        [a, b] => Some(format!("{a} and {b} are typing…")),
        _ => Some("Several people are typing…".to_string()),
    }
}
