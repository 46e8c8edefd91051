//! # Message Renderer
//!
//! The view model behind the message list. Every visible line is an
//! [`Entry`]; chat entries are indexed by correlation key so a confirmation
//! or read receipt updates the existing entry instead of adding a new one.
//!
//! ```text
//! index: Temp("t1") ─┐                    confirm("t1", id 42)
//!                    ▼                          │
//! entries: [ .., Chat{temp_id: t1, pending} ]   ▼
//!                                      [ .., Chat{id: 42, sent} ]
//! index: Id("42") ───────────────────────────────┘
//! ```
//!
//! The TUI owns scrolling; the renderer only raises a "scroll to newest"
//! request after every render.

use std::collections::HashMap;

use crate::core::message::{Message, MessageStatus, ReadReceipt};

/// Identity of a chat entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CorrelationKey {
    /// Client-generated id of a pending message.
    Temp(String),
    /// Server id of a confirmed message.
    Id(String),
}

impl CorrelationKey {
    fn of(message: &Message) -> Option<CorrelationKey> {
        match (&message.id, &message.temp_id) {
            (Some(id), _) => Some(CorrelationKey::Id(id.clone())),
            (None, Some(temp_id)) => Some(CorrelationKey::Temp(temp_id.clone())),
            (None, None) => None,
        }
    }
}

/// One line in the message list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Chat(Message),
    /// Informational line (joins, leaves).
    System {
        text: String,
        timestamp: Option<String>,
    },
    /// Anything the client does not understand, shown as-is.
    Generic(String),
}

/// How a server confirmation was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciled {
    /// The pending entry was updated in place.
    InPlace,
    /// No pending entry matched; a new sent entry was appended.
    Appended,
}

#[derive(Debug)]
pub struct MessageView {
    local_user: String,
    entries: Vec<Entry>,
    index: HashMap<CorrelationKey, usize>,
    scroll_requested: bool,
}

impl MessageView {
    pub fn new(local_user: impl Into<String>) -> Self {
        Self {
            local_user: local_user.into(),
            entries: Vec::new(),
            index: HashMap::new(),
            scroll_requested: false,
        }
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }

    /// Render one record. Chat records with a known correlation key update
    /// their existing entry; everything else is appended.
    pub fn render(&mut self, entry: Entry) -> usize {
        let pos = match entry {
            Entry::Chat(message) => self.upsert(message),
            other => {
                self.entries.push(other);
                self.entries.len() - 1
            }
        };
        self.scroll_requested = true;
        pos
    }

    /// Apply the server's confirmation of the pending message `temp_id`.
    pub fn confirm(&mut self, temp_id: &str, confirmed: Message) -> Reconciled {
        let key = CorrelationKey::Temp(temp_id.to_string());
        let Some(pos) = self.index.remove(&key) else {
            self.render(Entry::Chat(confirmed));
            return Reconciled::Appended;
        };

        if let Some(Entry::Chat(existing)) = self.entries.get_mut(pos) {
            existing.id = confirmed.id;
            existing.temp_id = None;
            existing.sender = confirmed.sender;
            existing.content = confirmed.content;
            existing.timestamp = confirmed.timestamp.or(existing.timestamp.take());
            existing.status = MessageStatus::Sent;
            if let Some(key) = CorrelationKey::of(existing) {
                self.index.insert(key, pos);
            }
        }
        self.scroll_requested = true;
        Reconciled::InPlace
    }

    /// Attach a read receipt to the message with server id `message_id`.
    /// Returns false when no such message is shown.
    pub fn apply_seen(&mut self, message_id: &str, receipt: ReadReceipt) -> bool {
        let key = CorrelationKey::Id(message_id.to_string());
        let Some(&pos) = self.index.get(&key) else {
            return false;
        };
        match self.entries.get_mut(pos) {
            Some(Entry::Chat(message)) => {
                message.status = MessageStatus::Seen;
                message.receipt = Some(receipt);
                true
            }
            _ => false,
        }
    }

    pub fn find_by_temp_id(&self, temp_id: &str) -> Option<&Message> {
        self.find(&CorrelationKey::Temp(temp_id.to_string()))
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Message> {
        self.find(&CorrelationKey::Id(id.to_string()))
    }

    /// Number of chat entries that represent this server id or temp id.
    pub fn count_chat(&self, predicate: impl Fn(&Message) -> bool) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e, Entry::Chat(m) if predicate(m)))
            .count()
    }

    /// "You" for the local user, the sender's name otherwise.
    pub fn sender_label<'a>(&self, message: &'a Message) -> &'a str {
        if message.sender == self.local_user {
            "You"
        } else {
            &message.sender
        }
    }

    /// Status annotation, shown only on the local user's own messages.
    pub fn status_label(&self, message: &Message) -> Option<&'static str> {
        (message.sender == self.local_user).then(|| message.status.label())
    }

    /// Take the pending scroll-to-newest request, if any.
    pub fn take_scroll_request(&mut self) -> bool {
        std::mem::take(&mut self.scroll_requested)
    }

    fn find(&self, key: &CorrelationKey) -> Option<&Message> {
        match self.entries.get(*self.index.get(key)?) {
            Some(Entry::Chat(message)) => Some(message),
            _ => None,
        }
    }

    fn upsert(&mut self, message: Message) -> usize {
        let existing = message
            .temp_id
            .as_ref()
            .and_then(|t| self.index.get(&CorrelationKey::Temp(t.clone())))
            .or_else(|| {
                message
                    .id
                    .as_ref()
                    .and_then(|id| self.index.get(&CorrelationKey::Id(id.clone())))
            })
            .copied();

        let key = CorrelationKey::of(&message);
        let pos = match existing {
            Some(pos) => {
                if let Some(Entry::Chat(old)) = self.entries.get(pos)
                    && let Some(old_key) = CorrelationKey::of(old)
                {
                    self.index.remove(&old_key);
                }
                self.entries[pos] = Entry::Chat(message);
                pos
            }
            None => {
                self.entries.push(Entry::Chat(message));
                self.entries.len() - 1
            }
        };
        if let Some(key) = key {
            self.index.insert(key, pos);
        }
        pos
    }
}
