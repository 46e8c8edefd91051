//! # Chat Messages
//!
//! The client-side view of a chat message: correlation ids, delivery status
//! and the optional read receipt.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};

use crate::core::protocol::WireMessage;

/// Delivery status of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageStatus {
    /// Rendered optimistically, not yet confirmed by the server.
    Pending,
    /// Confirmed by the server (or loaded from history).
    Sent,
    /// A read receipt arrived for it.
    Seen,
}

impl MessageStatus {
    pub fn label(self) -> &'static str {
        match self {
            MessageStatus::Pending => "pending",
            MessageStatus::Sent => "sent",
            MessageStatus::Seen => "seen",
        }
    }
}

/// Read-receipt annotation from a `seen_update`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadReceipt {
    pub seen_by: String,
    pub seen_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Server id, present once confirmed.
    pub id: Option<String>,
    /// Client correlation id, present only while pending.
    pub temp_id: Option<String>,
    pub sender: String,
    pub content: String,
    /// ISO 8601 as sent by the server (often without an offset).
    pub timestamp: Option<String>,
    pub status: MessageStatus,
    pub receipt: Option<ReadReceipt>,
}

impl Message {
    /// A locally composed message awaiting confirmation.
    pub fn pending(temp_id: String, sender: String, content: String) -> Self {
        Self {
            id: None,
            temp_id: Some(temp_id),
            sender,
            content,
            timestamp: Some(Utc::now().to_rfc3339()),
            status: MessageStatus::Pending,
            receipt: None,
        }
    }

    /// A server-authoritative message. The `tempId` is dropped: once a
    /// message is known to the server it is keyed by `id` only.
    pub fn from_wire(wire: WireMessage, status: MessageStatus) -> Self {
        Self {
            id: wire.id,
            temp_id: None,
            sender: wire.sender,
            content: wire.content,
            timestamp: wire.timestamp,
            status,
            receipt: None,
        }
    }

    /// Timestamp in the local timezone, for display.
    pub fn display_timestamp(&self) -> Option<String> {
        self.timestamp
            .as_deref()
            .and_then(|raw| format_timestamp_in(raw, &Local))
    }
}

/// Generate a fresh client correlation id.
pub fn new_temp_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Parse an ISO 8601 timestamp. Offset-less values are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Format a raw timestamp as a short human-readable string in `tz`.
pub fn format_timestamp_in<Tz>(raw: &str, tz: &Tz) -> Option<String>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let utc = parse_timestamp(raw)?;
    Some(utc.with_timezone(tz).format("%b %-d, %H:%M").to_string())
}
