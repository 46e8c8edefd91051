//! # Wire Protocol
//!
//! JSON frames exchanged with the chat server over the room WebSocket.
//!
//! ```text
//! client → server   {"content": "...", "tempId": "..."}
//!                   {"type": "typing", "status": "start" | "stop"}
//!                   {"type": "seen", "message_id": "..."}
//!
//! server → client   {"type": "history" | "error" | "chat_message"
//!                          | "seen_update" | "typing_update" | "system", ...}
//! ```
//!
//! Inbound frames are decoded leniently: a frame with no `type` that looks
//! like a message is treated as `chat_message`, and any other unknown shape
//! becomes [`ServerEvent::Unrecognized`] so it can still be shown.

use std::fmt;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Typing presence status carried by `typing` frames.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TypingStatus {
    Start,
    Stop,
}

/// Frames the client sends to the server.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum ClientFrame {
    /// A composed chat message, correlated by its client-generated `tempId`.
    Chat {
        content: String,
        #[serde(rename = "tempId")]
        temp_id: String,
    },
    Control(ControlFrame),
}

/// Typed control frames (`type` discriminated).
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ControlFrame {
    Typing { status: TypingStatus },
    Seen { message_id: String },
}

impl ClientFrame {
    pub fn chat(content: impl Into<String>, temp_id: impl Into<String>) -> Self {
        ClientFrame::Chat {
            content: content.into(),
            temp_id: temp_id.into(),
        }
    }

    pub fn typing(status: TypingStatus) -> Self {
        ClientFrame::Control(ControlFrame::Typing { status })
    }

    pub fn seen(message_id: impl Into<String>) -> Self {
        ClientFrame::Control(ControlFrame::Seen {
            message_id: message_id.into(),
        })
    }

    /// Serialize to the JSON text sent over the socket.
    pub fn encode(&self) -> Result<String, ProtocolError> {
        serde_json::to_string(self).map_err(ProtocolError::Encode)
    }
}

/// A message record as the server sends it (history entries and `chat_message`).
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct WireMessage {
    #[serde(default, deserialize_with = "optional_id")]
    pub id: Option<String>,
    #[serde(rename = "tempId", default)]
    pub temp_id: Option<String>,
    #[serde(default = "default_sender")]
    pub sender: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}

fn default_sender() -> String {
    "System".to_string()
}

/// Events decoded from server frames.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerEvent {
    /// Initial snapshot; replaces the whole message list.
    History(Vec<WireMessage>),
    /// Application-level error to surface to the user.
    Error(String),
    ChatMessage(WireMessage),
    SeenUpdate {
        message_id: String,
        seen_by: String,
        seen_at: Option<String>,
    },
    /// Everyone the server currently reports as typing (may include us).
    TypingUpdate(Vec<String>),
    /// Join/leave notices and similar informational lines.
    System {
        message: String,
        timestamp: Option<String>,
    },
    /// Unknown `type`, or a type-less frame that isn't message-shaped.
    Unrecognized(Value),
}

#[derive(Deserialize)]
struct HistoryPayload {
    #[serde(default)]
    messages: Vec<WireMessage>,
}

#[derive(Deserialize)]
struct ErrorPayload {
    #[serde(default)]
    message: String,
}

#[derive(Deserialize)]
struct SeenPayload {
    #[serde(deserialize_with = "required_id")]
    message_id: String,
    #[serde(default)]
    seen_by: String,
    #[serde(default)]
    seen_at: Option<String>,
}

#[derive(Deserialize)]
struct TypingPayload {
    #[serde(default)]
    users: Vec<String>,
}

#[derive(Deserialize)]
struct SystemPayload {
    #[serde(default)]
    message: String,
    #[serde(default)]
    timestamp: Option<String>,
}

impl ServerEvent {
    /// Decode one inbound text frame.
    ///
    /// Fails only when the text is not JSON or a known `type` carries a
    /// payload of the wrong shape.
    pub fn parse(text: &str) -> Result<ServerEvent, ProtocolError> {
        let value: Value = serde_json::from_str(text).map_err(ProtocolError::Json)?;

        let kind = match value.get("type") {
            Some(Value::String(kind)) => kind.clone(),
            Some(_) => return Ok(ServerEvent::Unrecognized(value)),
            None if value.get("content").is_some() => "chat_message".to_string(),
            None => return Ok(ServerEvent::Unrecognized(value)),
        };

        let payload_err = |source| ProtocolError::Payload {
            kind: kind.clone(),
            source,
        };

        let event = match kind.as_str() {
            "history" => {
                let p: HistoryPayload = serde_json::from_value(value).map_err(payload_err)?;
                ServerEvent::History(p.messages)
            }
            "error" => {
                let p: ErrorPayload = serde_json::from_value(value).map_err(payload_err)?;
                ServerEvent::Error(p.message)
            }
            "chat_message" => {
                ServerEvent::ChatMessage(serde_json::from_value(value).map_err(payload_err)?)
            }
            "seen_update" => {
                let p: SeenPayload = serde_json::from_value(value).map_err(payload_err)?;
                ServerEvent::SeenUpdate {
                    message_id: p.message_id,
                    seen_by: p.seen_by,
                    seen_at: p.seen_at,
                }
            }
            "typing_update" => {
                let p: TypingPayload = serde_json::from_value(value).map_err(payload_err)?;
                ServerEvent::TypingUpdate(p.users)
            }
            "system" => {
                let p: SystemPayload = serde_json::from_value(value).map_err(payload_err)?;
                ServerEvent::System {
                    message: p.message,
                    timestamp: p.timestamp,
                }
            }
            _ => ServerEvent::Unrecognized(value),
        };
        Ok(event)
    }
}

/// Server ids are integers in practice but strings on the client side.
fn id_from_value<E: de::Error>(value: Value) -> Result<Option<String>, E> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        other => Err(E::custom(format!("expected string or number id, got {other}"))),
    }
}

fn optional_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    id_from_value(Value::deserialize(deserializer)?)
}

fn required_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    id_from_value::<D::Error>(Value::deserialize(deserializer)?)?
        .ok_or_else(|| de::Error::custom("message id is null"))
}

/// Errors from encoding or decoding frames.
#[derive(Debug)]
pub enum ProtocolError {
    /// Outbound frame could not be serialized.
    Encode(serde_json::Error),
    /// Inbound text is not valid JSON.
    Json(serde_json::Error),
    /// Inbound frame has a known `type` but a malformed payload.
    Payload {
        kind: String,
        source: serde_json::Error,
    },
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::Encode(e) => write!(f, "failed to encode frame: {e}"),
            ProtocolError::Json(e) => write!(f, "frame is not JSON: {e}"),
            ProtocolError::Payload { kind, source } => {
                write!(f, "malformed '{kind}' frame: {source}")
            }
        }
    }
}

impl std::error::Error for ProtocolError {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn encoded(frame: ClientFrame) -> Value {
        serde_json::from_str(&frame.encode().unwrap()).unwrap()
    }

    #[test]
    fn chat_frame_uses_temp_id_camel_case() {
        assert_eq!(
            encoded(ClientFrame::chat("hi", "t1")),
            json!({"content": "hi", "tempId": "t1"})
        );
    }

    #[test]
    fn typing_and_seen_frames_are_tagged() {
        assert_eq!(
            encoded(ClientFrame::typing(TypingStatus::Start)),
            json!({"type": "typing", "status": "start"})
        );
        assert_eq!(
            encoded(ClientFrame::typing(TypingStatus::Stop)),
            json!({"type": "typing", "status": "stop"})
        );
        assert_eq!(
            encoded(ClientFrame::seen("42")),
            json!({"type": "seen", "message_id": "42"})
        );
    }

    #[test]
    fn parses_history_with_numeric_ids() {
        let text = r#"{"type":"history","messages":[
            {"id":1,"sender":"bob","content":"hello","timestamp":"2024-05-01T10:00:00"},
            {"id":"2","sender":"alice","content":"hi","timestamp":"2024-05-01T10:01:00"}]}"#;
        let ServerEvent::History(messages) = ServerEvent::parse(text).unwrap() else {
            panic!("expected history");
        };
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].id.as_deref(), Some("1"));
        assert_eq!(messages[1].id.as_deref(), Some("2"));
        assert_eq!(messages[0].temp_id, None);
    }

    #[test]
    fn parses_confirmation_with_temp_id() {
        let text = r#"{"type":"chat_message","id":42,"tempId":"t1","sender":"alice",
                       "content":"hi","timestamp":"2024-05-01T10:00:00"}"#;
        let ServerEvent::ChatMessage(msg) = ServerEvent::parse(text).unwrap() else {
            panic!("expected chat message");
        };
        assert_eq!(msg.id.as_deref(), Some("42"));
        assert_eq!(msg.temp_id.as_deref(), Some("t1"));
        assert_eq!(msg.sender, "alice");
    }

    #[test]
    fn bare_message_defaults_to_chat_message() {
        let text = r#"{"id":7,"sender":"bob","content":"yo"}"#;
        assert!(matches!(
            ServerEvent::parse(text).unwrap(),
            ServerEvent::ChatMessage(ref m) if m.content == "yo"
        ));
    }

    #[test]
    fn unknown_type_is_unrecognized_not_an_error() {
        let text = r#"{"type":"reaction","emoji":"+1"}"#;
        assert!(matches!(
            ServerEvent::parse(text).unwrap(),
            ServerEvent::Unrecognized(_)
        ));

        let shapeless = r#"{"hello":"world"}"#;
        assert!(matches!(
            ServerEvent::parse(shapeless).unwrap(),
            ServerEvent::Unrecognized(_)
        ));
    }

    #[test]
    fn parses_seen_typing_system_and_error() {
        assert_eq!(
            ServerEvent::parse(
                r#"{"type":"seen_update","message_id":5,"seen_by":"bob","seen_at":"2024-05-01T10:02:00"}"#
            )
            .unwrap(),
            ServerEvent::SeenUpdate {
                message_id: "5".into(),
                seen_by: "bob".into(),
                seen_at: Some("2024-05-01T10:02:00".into()),
            }
        );
        assert_eq!(
            ServerEvent::parse(r#"{"type":"typing_update","users":["bob","carol"]}"#).unwrap(),
            ServerEvent::TypingUpdate(vec!["bob".into(), "carol".into()])
        );
        assert_eq!(
            ServerEvent::parse(r#"{"type":"system","message":"bob joined the room."}"#).unwrap(),
            ServerEvent::System {
                message: "bob joined the room.".into(),
                timestamp: None,
            }
        );
        assert_eq!(
            ServerEvent::parse(r#"{"type":"error","message":"You are not a member of this room."}"#)
                .unwrap(),
            ServerEvent::Error("You are not a member of this room.".into())
        );
    }

    #[test]
    fn malformed_payload_and_non_json_are_errors() {
        assert!(matches!(
            ServerEvent::parse(r#"{"type":"seen_update","message_id":[1]}"#),
            Err(ProtocolError::Payload { ref kind, .. }) if kind == "seen_update"
        ));
        assert!(matches!(
            ServerEvent::parse("not json"),
            Err(ProtocolError::Json(_))
        ));
    }
}
