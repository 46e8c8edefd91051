//! # Effect Runtime
//!
//! Carries out the [`Effect`]s returned by `update()`: owns the live
//! transport handle and the typing idle timer. Everything it starts reports
//! back as an [`Action`] on the shared channel.

use log::{debug, info, warn};
use std::sync::mpsc;
use std::time::Duration;
use tokio::task::AbortHandle;

use crate::core::action::{Action, Effect};
use crate::core::connection::ConnectionId;
use crate::transport::{self, TransportHandle};

pub struct Runtime {
    actions: mpsc::Sender<Action>,
    transport: Option<TransportHandle>,
    typing_timer: Option<AbortHandle>,
}

impl Runtime {
    pub fn new(actions: mpsc::Sender<Action>) -> Self {
        Self {
            actions,
            transport: None,
            typing_timer: None,
        }
    }

    /// Connection id of the live transport, if any.
    pub fn connection(&self) -> Option<ConnectionId> {
        self.transport.as_ref().map(TransportHandle::connection)
    }

    /// Execute effects in order. Returns true when the app should quit.
    pub fn apply(&mut self, effects: Vec<Effect>) -> bool {
        let mut quit = false;
        for effect in effects {
            match effect {
                Effect::OpenTransport { connection, url } => {
                    if let Some(old) = self.transport.take() {
                        old.close();
                    }
                    info!("Opening transport {} to {}", connection, url);
                    self.transport = Some(transport::spawn(connection, url, self.actions.clone()));
                }
                Effect::CloseTransport(connection) => {
                    if self.connection() == Some(connection)
                        && let Some(handle) = self.transport.take()
                    {
                        handle.close();
                    }
                }
                Effect::Send { connection, frame } => match self.transport.as_ref() {
                    Some(handle) if handle.connection() == connection => {
                        if let Err(e) = handle.send(frame) {
                            warn!("Dropping frame for transport {}: {}", connection, e);
                        }
                    }
                    _ => warn!("Dropping frame for inactive transport {}", connection),
                },
                Effect::ScheduleTypingIdle { generation, after } => {
                    self.schedule_typing_idle(generation, after);
                }
                Effect::CancelTypingIdle => self.cancel_typing_idle(),
                Effect::Quit => quit = true,
            }
        }
        quit
    }

    /// Close everything on the way out.
    pub fn shutdown(&mut self) {
        self.cancel_typing_idle();
        if let Some(handle) = self.transport.take() {
            handle.close();
        }
    }

    fn schedule_typing_idle(&mut self, generation: u64, after: Duration) {
        self.cancel_typing_idle();
        let tx = self.actions.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep(after).await;
            if tx.send(Action::TypingIdle(generation)).is_err() {
                debug!("Typing timer {} fired after receiver dropped", generation);
            }
        });
        self.typing_timer = Some(task.abort_handle());
    }

    fn cancel_typing_idle(&mut self) {
        if let Some(timer) = self.typing_timer.take() {
            timer.abort();
        }
    }
}
