//! # Outbound Queue
//!
//! Messages composed while the transport is not open wait here, in
//! submission order, until the next successful open flushes them.
//!
//! ```text
//! enqueue ──▶ queued (FIFO) ──flush──▶ in_flight ──acknowledge──▶ dropped
//!                                          ▲
//!               direct send ───────────────┘
//! ```
//!
//! A record stays in flight after it is handed to the transport. It is
//! released when the server's confirmation for its `tempId` arrives, or when
//! a history snapshot shows the server stored it.

use std::collections::VecDeque;

/// A composed message not yet confirmed by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSend {
    pub temp_id: String,
    pub content: String,
}

#[derive(Debug, Default)]
pub struct OutboundQueue {
    queued: VecDeque<PendingSend>,
    in_flight: Vec<PendingSend>,
}

impl OutboundQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message that could not be sent yet. No deduplication:
    /// identical content with distinct `temp_id`s are distinct entries.
    pub fn enqueue(&mut self, content: String, temp_id: String) {
        self.queued.push_back(PendingSend { temp_id, content });
    }

    /// Drain the queue in FIFO order, calling `sender(content, temp_id)` for
    /// each entry. An entry leaves the queue only after its call returns.
    /// Returns the number of entries flushed.
    pub fn flush<F>(&mut self, mut sender: F) -> usize
    where
        F: FnMut(&str, &str),
    {
        let mut flushed = 0;
        while let Some(next) = self.queued.front() {
            sender(&next.content, &next.temp_id);
            if let Some(sent) = self.queued.pop_front() {
                self.in_flight.push(sent);
                flushed += 1;
            }
        }
        flushed
    }

    /// Record a message that was sent immediately over an open transport.
    pub fn mark_in_flight(&mut self, content: String, temp_id: String) {
        self.in_flight.push(PendingSend { temp_id, content });
    }

    /// Release the record for a confirmed `temp_id`.
    pub fn acknowledge(&mut self, temp_id: &str) -> Option<PendingSend> {
        let pos = self.in_flight.iter().position(|p| p.temp_id == temp_id)?;
        Some(self.in_flight.remove(pos))
    }

    /// Release the in-flight record a persisted own message stands for: the
    /// one with its `temp_id` if the server kept it, else the oldest record
    /// with the same content.
    pub fn release_persisted(&mut self, temp_id: Option<&str>, content: &str) -> Option<PendingSend> {
        if let Some(released) = temp_id.and_then(|t| self.acknowledge(t)) {
            return Some(released);
        }
        let pos = self.in_flight.iter().position(|p| p.content == content)?;
        Some(self.in_flight.remove(pos))
    }

    pub fn queued(&self) -> impl Iterator<Item = &PendingSend> {
        self.queued.iter()
    }

    pub fn in_flight(&self) -> impl Iterator<Item = &PendingSend> {
        self.in_flight.iter()
    }

    pub fn queued_len(&self) -> usize {
        self.queued.len()
    }

    pub fn in_flight_len(&self) -> usize {
        self.in_flight.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queued.is_empty() && self.in_flight.is_empty()
    }
}
