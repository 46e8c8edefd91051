//! # Actions
//!
//! Everything that can happen in the chat client becomes an `Action`.
//! User presses Enter? That's `Action::Submit(text)`.
//! Server sends a frame? That's `Action::FrameReceived { .. }`.
//!
//! The `update()` function takes the current state and an action, mutates
//! the state and returns the [`Effect`]s the runtime must carry out. No I/O
//! happens here.
//!
//! ```text
//! State + Action  →  update()  →  New State + Vec<Effect>
//! ```
//!
//! Transport and timer events carry the id of the connection or timer that
//! produced them; anything from a superseded one is dropped here, so a late
//! close from an old room can never touch the new session.

use log::{debug, error, info, warn};
use serde_json::Value;
use std::time::Duration;

use crate::core::connection::{Connection, ConnectionId, Transition, TransportEvent, endpoint_url};
use crate::core::message::{Message, MessageStatus, ReadReceipt, new_temp_id};
use crate::core::protocol::{ClientFrame, ServerEvent, WireMessage};
use crate::core::renderer::{Entry, Reconciled};
use crate::core::session::RoomSession;
use crate::core::state::App;
use crate::core::typing::{TypingAction, typing_line};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Enter a room, replacing the current session if it is a different room.
    JoinRoom(String),
    /// Fresh connect to the current room.
    Reconnect,
    TransportOpened(ConnectionId),
    FrameReceived {
        connection: ConnectionId,
        text: String,
    },
    TransportClosed(ConnectionId),
    TransportFailed {
        connection: ConnectionId,
        error: String,
    },
    /// Enter pressed in the compose box (message or `/command`).
    Submit(String),
    /// The compose input was edited.
    Keystroke,
    /// Typing idle timer with this generation fired.
    TypingIdle(u64),
    DismissNotice,
    Quit,
}

/// Side effects for the runtime to perform after `update()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    OpenTransport {
        connection: ConnectionId,
        url: String,
    },
    CloseTransport(ConnectionId),
    Send {
        connection: ConnectionId,
        frame: ClientFrame,
    },
    ScheduleTypingIdle {
        generation: u64,
        after: Duration,
    },
    CancelTypingIdle,
    Quit,
}

pub fn update(app: &mut App, action: Action) -> Vec<Effect> {
    match action {
        Action::JoinRoom(room_id) => connect(app, &room_id),
        Action::Reconnect => reconnect(app),
        Action::TransportOpened(id) => transport_event(app, id, TransportEvent::Opened),
        Action::TransportClosed(id) => transport_event(app, id, TransportEvent::Closed),
        Action::TransportFailed { connection, error } => {
            transport_event(app, connection, TransportEvent::Failed(error))
        }
        Action::FrameReceived { connection, text } => frame_received(app, connection, &text),
        Action::Submit(text) => submit(app, &text),
        Action::Keystroke => keystroke(app),
        Action::TypingIdle(generation) => match app.session.as_mut() {
            Some(session) => {
                let actions = session.typing.idle_elapsed(generation);
                typing_effects(session, actions)
            }
            None => Vec::new(),
        },
        Action::DismissNotice => {
            app.notice = None;
            Vec::new()
        }
        Action::Quit => vec![Effect::Quit],
    }
}

// ============================================================================
// Connection management
// ============================================================================

/// Tear down whatever is open and start a new connection to `room_id`.
fn connect(app: &mut App, room_id: &str) -> Vec<Effect> {
    let room_id = room_id.trim();
    if room_id.is_empty() {
        app.status_message = "Usage: /join <room>".to_string();
        return Vec::new();
    }

    let url = match endpoint_url(&app.server_origin, room_id) {
        Ok(url) => url,
        Err(e) => {
            error!("Cannot connect to room {}: {}", room_id, e);
            app.status_message = e.to_string();
            return Vec::new();
        }
    };

    let mut effects = Vec::new();
    let same_room = app.room_id() == Some(room_id);
    if let Some(session) = app.session.as_mut() {
        effects.extend(teardown(session));
    }

    let id = app.allocate_connection_id();
    if !same_room {
        info!("Switching to room {}", room_id);
        app.session = Some(RoomSession::new(room_id, &app.username, app.typing_idle));
    }
    if let Some(session) = app.session.as_mut() {
        session.connection = Some(Connection::new(id, room_id, url.clone()));
    }

    info!("Connecting to {} (connection {})", url, id);
    app.status_message = format!("Connecting to room {room_id}…");
    effects.push(Effect::OpenTransport { connection: id, url });
    effects
}

fn reconnect(app: &mut App) -> Vec<Effect> {
    match app.room_id().map(str::to_string) {
        Some(room_id) => connect(app, &room_id),
        None => {
            app.status_message = "No room to reconnect to. Use /join <room>".to_string();
            Vec::new()
        }
    }
}

/// Forget the session's connection and local typing state.
fn teardown(session: &mut RoomSession) -> Vec<Effect> {
    let mut effects = Vec::new();
    if let Some(mut connection) = session.connection.take() {
        debug!("Tearing down connection {}", connection.id());
        connection.teardown();
        effects.push(Effect::CloseTransport(connection.id()));
    }
    let actions = session.typing.reset();
    effects.extend(typing_effects(session, actions));
    session.typing_line = None;
    effects
}

fn transport_event(app: &mut App, id: ConnectionId, event: TransportEvent) -> Vec<Effect> {
    let Some(session) = app.session.as_mut() else {
        debug!("Ignoring {:?} from connection {}: no session", event, id);
        return Vec::new();
    };
    let Some(connection) = session.connection.as_mut() else {
        debug!("Ignoring {:?} from stale connection {}", event, id);
        return Vec::new();
    };

    match connection.handle(id, event) {
        Transition::Opened => {
            info!("Connected to room {}", session.room_id);
            app.status_message = format!("Connected to room {}", session.room_id);
            session.view.clear();

            let mut frames = Vec::new();
            let flushed = session
                .queue
                .flush(|content, temp_id| frames.push(ClientFrame::chat(content, temp_id)));
            if flushed > 0 {
                info!("Flushed {} queued message(s)", flushed);
            }
            session.restore_unconfirmed(&app.username);

            frames
                .into_iter()
                .map(|frame| Effect::Send {
                    connection: id,
                    frame,
                })
                .collect()
        }
        Transition::Closed => {
            info!("Disconnected from room {}", session.room_id);
            app.status_message = format!("Disconnected from room {}", session.room_id);
            teardown(session)
        }
        Transition::Failed(reason) => {
            error!("Connection to room {} failed: {}", session.room_id, reason);
            app.status_message = format!("Disconnected from room {}: {}", session.room_id, reason);
            teardown(session)
        }
        Transition::Ignored => {
            debug!("Ignoring transport event from connection {}", id);
            Vec::new()
        }
    }
}

// ============================================================================
// Inbound frames
// ============================================================================

fn frame_received(app: &mut App, id: ConnectionId, text: &str) -> Vec<Effect> {
    let Some(session) = app.session.as_mut() else {
        return Vec::new();
    };
    if !session.is_current(id) {
        debug!("Dropping frame from stale connection {}", id);
        return Vec::new();
    }

    let event = match ServerEvent::parse(text) {
        Ok(event) => event,
        Err(e) => {
            warn!("Rendering unparseable frame verbatim: {}", e);
            session.view.render(Entry::Generic(text.to_string()));
            return Vec::new();
        }
    };

    match event {
        ServerEvent::History(messages) => {
            debug!("History snapshot with {} message(s)", messages.len());
            session.view.clear();
            for wire in messages {
                if wire.sender == app.username
                    && let Some(released) = session
                        .queue
                        .release_persisted(wire.temp_id.as_deref(), &wire.content)
                {
                    debug!("History holds in-flight message {}", released.temp_id);
                }
                session
                    .view
                    .render(Entry::Chat(Message::from_wire(wire, MessageStatus::Sent)));
            }
            session.restore_unconfirmed(&app.username);
            Vec::new()
        }
        ServerEvent::Error(message) => {
            warn!("Server error: {}", message);
            app.notice = Some(message);
            Vec::new()
        }
        ServerEvent::ChatMessage(wire) => chat_message(session, &app.username, wire),
        ServerEvent::SeenUpdate {
            message_id,
            seen_by,
            seen_at,
        } => {
            if !session
                .view
                .apply_seen(&message_id, ReadReceipt { seen_by, seen_at })
            {
                debug!("Read receipt for unknown message {}", message_id);
            }
            Vec::new()
        }
        ServerEvent::TypingUpdate(users) => {
            session.typing_line = typing_line(&users, &app.username);
            Vec::new()
        }
        ServerEvent::System { message, timestamp } => {
            session.view.render(Entry::System {
                text: message,
                timestamp,
            });
            Vec::new()
        }
        ServerEvent::Unrecognized(value) => {
            debug!("Rendering unrecognized frame as generic: {}", value);
            session.view.render(Entry::Generic(generic_text(&value)));
            Vec::new()
        }
    }
}

/// Reconcile a confirmation, suppress our own echo, or render an incoming
/// message and acknowledge it with a `seen` frame.
fn chat_message(session: &mut RoomSession, local_user: &str, wire: WireMessage) -> Vec<Effect> {
    let confirmation = wire
        .temp_id
        .clone()
        .filter(|t| wire.sender == local_user || session.view.find_by_temp_id(t).is_some());

    if let Some(temp_id) = confirmation {
        if session.queue.acknowledge(&temp_id).is_none() {
            debug!("Confirmation for {} had no in-flight record", temp_id);
        }
        let message = Message::from_wire(wire, MessageStatus::Sent);
        if session.view.confirm(&temp_id, message) == Reconciled::Appended {
            debug!("No pending entry for {}, appended confirmed message", temp_id);
        }
        return Vec::new();
    }

    if wire.sender == local_user {
        debug!("Suppressing echo of own message {:?}", wire.id);
        return Vec::new();
    }

    let message_id = wire.id.clone();
    session
        .view
        .render(Entry::Chat(Message::from_wire(wire, MessageStatus::Sent)));

    match (message_id, session.open_connection()) {
        (Some(message_id), Some(connection)) => vec![Effect::Send {
            connection,
            frame: ClientFrame::seen(message_id),
        }],
        _ => Vec::new(),
    }
}

/// Best human-readable text for a frame the client does not understand.
fn generic_text(value: &Value) -> String {
    ["message", "content"]
        .iter()
        .find_map(|key| value.get(*key).and_then(Value::as_str))
        .map(str::to_string)
        .unwrap_or_else(|| value.to_string())
}

// ============================================================================
// Compose
// ============================================================================

fn submit(app: &mut App, text: &str) -> Vec<Effect> {
    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }
    if let Some(command) = text.strip_prefix('/') {
        return run_command(app, command);
    }

    let Some(session) = app.session.as_mut() else {
        app.status_message = "Join a room first with /join <room>".to_string();
        return Vec::new();
    };

    let temp_id = new_temp_id();
    session.view.render(Entry::Chat(Message::pending(
        temp_id.clone(),
        app.username.clone(),
        text.to_string(),
    )));

    let mut effects = Vec::new();
    match session.open_connection() {
        Some(connection) => {
            effects.push(Effect::Send {
                connection,
                frame: ClientFrame::chat(text, temp_id.clone()),
            });
            session.queue.mark_in_flight(text.to_string(), temp_id);
        }
        None => {
            debug!("Transport not open, queueing {}", temp_id);
            session.queue.enqueue(text.to_string(), temp_id);
        }
    }

    let actions = session.typing.message_sent();
    effects.extend(typing_effects(session, actions));
    effects
}

fn run_command(app: &mut App, command: &str) -> Vec<Effect> {
    let (name, arg) = command
        .split_once(char::is_whitespace)
        .map_or((command, ""), |(name, arg)| (name, arg.trim()));

    match name {
        "join" => connect(app, arg),
        "reconnect" => reconnect(app),
        "quit" => vec![Effect::Quit],
        other => {
            app.status_message = format!("Unknown command: /{other}");
            Vec::new()
        }
    }
}

// ============================================================================
// Typing
// ============================================================================

/// Presence only tracks bursts the server can see: while the transport is
/// not open, keystrokes leave the tracker idle.
fn keystroke(app: &mut App) -> Vec<Effect> {
    if app.session.as_ref().and_then(RoomSession::open_connection).is_none() {
        return Vec::new();
    }
    let generation = app.allocate_typing_generation();
    match app.session.as_mut() {
        Some(session) => {
            let actions = session.typing.keystroke(generation);
            typing_effects(session, actions)
        }
        None => Vec::new(),
    }
}

/// Translate tracker output into effects. Typing frames are dropped while
/// the transport is not open.
fn typing_effects(session: &RoomSession, actions: Vec<TypingAction>) -> Vec<Effect> {
    actions
        .into_iter()
        .filter_map(|action| match action {
            TypingAction::Emit(status) => match session.open_connection() {
                Some(connection) => Some(Effect::Send {
                    connection,
                    frame: ClientFrame::typing(status),
                }),
                None => {
                    debug!("Not connected, dropping typing {:?}", status);
                    None
                }
            },
            TypingAction::CancelIdle => Some(Effect::CancelTypingIdle),
            TypingAction::ScheduleIdle { generation, after } => {
                Some(Effect::ScheduleTypingIdle { generation, after })
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::connection::ConnectionState;
    use crate::core::protocol::TypingStatus;
    use crate::test_support::{joined_app, open_app, sent_chat_frames, test_app};

    fn opened_id(effects: &[Effect]) -> ConnectionId {
        effects
            .iter()
            .find_map(|e| match e {
                Effect::OpenTransport { connection, .. } => Some(*connection),
                _ => None,
            })
            .unwrap()
    }

    fn frame(app: &mut App, id: ConnectionId, text: &str) -> Vec<Effect> {
        update(
            app,
            Action::FrameReceived {
                connection: id,
                text: text.to_string(),
            },
        )
    }

    // ========================================================================
    // Connection
    // ========================================================================

    #[test]
    fn test_join_opens_transport_with_room_url() {
        let mut app = test_app();
        let effects = update(&mut app, Action::Submit("/join 7".into()));
        assert!(matches!(
            effects.as_slice(),
            [Effect::OpenTransport { url, .. }] if url == "ws://localhost:8000/ws/chat/7"
        ));
        let session = app.session.as_ref().unwrap();
        assert_eq!(session.room_id, "7");
        assert_eq!(session.connection_state(), ConnectionState::Connecting);
    }

    #[test]
    fn test_join_without_room_shows_usage() {
        let mut app = test_app();
        assert!(update(&mut app, Action::Submit("/join".into())).is_empty());
        assert!(app.status_message.contains("Usage"));
        assert!(app.session.is_none());
    }

    #[test]
    fn test_switching_rooms_closes_old_connection_first() {
        let (mut app, old) = open_app("1");
        let effects = update(&mut app, Action::JoinRoom("2".into()));

        assert_eq!(effects[0], Effect::CloseTransport(old));
        let new = opened_id(&effects);
        assert_ne!(new, old);
        assert_eq!(app.room_id(), Some("2"));
    }

    #[test]
    fn test_stale_close_after_switch_does_not_disconnect_new_room() {
        let (mut app, old) = open_app("1");
        let effects = update(&mut app, Action::JoinRoom("2".into()));
        let new = opened_id(&effects);
        update(&mut app, Action::TransportOpened(new));

        let effects = update(&mut app, Action::TransportClosed(old));

        assert!(effects.is_empty());
        let session = app.session.as_ref().unwrap();
        assert_eq!(session.connection_state(), ConnectionState::Open);
        assert!(!app.status_message.contains("Disconnected"));
    }

    #[test]
    fn test_stale_frames_are_dropped() {
        let (mut app, old) = open_app("1");
        let new = opened_id(&update(&mut app, Action::JoinRoom("2".into())));
        update(&mut app, Action::TransportOpened(new));

        frame(&mut app, old, r#"{"type":"system","message":"from the old room"}"#);
        assert!(app.session.as_ref().unwrap().view.is_empty());
    }

    #[test]
    fn test_close_clears_connection_without_reconnecting() {
        let (mut app, id) = open_app("1");
        let effects = update(&mut app, Action::TransportClosed(id));

        assert!(effects.iter().all(|e| !matches!(e, Effect::OpenTransport { .. })));
        let session = app.session.as_ref().unwrap();
        assert!(session.connection.is_none());
        assert!(app.status_message.contains("Disconnected"));
    }

    #[test]
    fn test_failure_clears_connection() {
        let (mut app, id) = open_app("1");
        update(
            &mut app,
            Action::TransportFailed {
                connection: id,
                error: "connection reset".into(),
            },
        );
        assert!(app.session.as_ref().unwrap().connection.is_none());
        assert!(app.status_message.contains("connection reset"));
    }

    #[test]
    fn test_reconnect_keeps_queue_and_uses_new_connection() {
        let (mut app, id) = open_app("1");
        update(&mut app, Action::TransportClosed(id));
        update(&mut app, Action::Submit("later".into()));

        let effects = update(&mut app, Action::Submit("/reconnect".into()));
        let new = opened_id(&effects);
        assert_ne!(new, id);

        let effects = update(&mut app, Action::TransportOpened(new));
        assert_eq!(sent_chat_frames(&effects), vec!["later".to_string()]);
    }

    #[test]
    fn test_reconnect_without_room_is_a_noop() {
        let mut app = test_app();
        assert!(update(&mut app, Action::Reconnect).is_empty());
    }

    #[test]
    fn test_bad_origin_reports_error_instead_of_connecting() {
        let mut app = test_app();
        app.server_origin = "not a url".into();
        assert!(update(&mut app, Action::JoinRoom("1".into())).is_empty());
        assert!(app.status_message.contains("invalid server origin"));
    }

    // ========================================================================
    // Outbound queue
    // ========================================================================

    #[test]
    fn test_sends_while_disconnected_flush_in_order_on_open() {
        let (mut app, id) = joined_app("1");
        for text in ["one", "two", "three"] {
            let effects = update(&mut app, Action::Submit(text.into()));
            assert!(sent_chat_frames(&effects).is_empty());
        }
        assert_eq!(app.session.as_ref().unwrap().queue.queued_len(), 3);

        let effects = update(&mut app, Action::TransportOpened(id));
        assert_eq!(sent_chat_frames(&effects), vec!["one", "two", "three"]);

        // Nothing is sent twice on a later open.
        let session = app.session.as_ref().unwrap();
        assert_eq!(session.queue.queued_len(), 0);
        assert_eq!(session.queue.in_flight_len(), 3);
    }

    #[test]
    fn test_send_while_open_goes_out_immediately() {
        let (mut app, _) = open_app("1");
        let effects = update(&mut app, Action::Submit("hello".into()));
        assert_eq!(sent_chat_frames(&effects), vec!["hello"]);
        let session = app.session.as_ref().unwrap();
        assert_eq!(session.queue.queued_len(), 0);
        assert_eq!(session.queue.in_flight_len(), 1);
    }

    #[test]
    fn test_blank_submit_is_ignored() {
        let (mut app, _) = open_app("1");
        assert!(update(&mut app, Action::Submit("   ".into())).is_empty());
        assert!(app.session.as_ref().unwrap().view.is_empty());
    }

    #[test]
    fn test_submit_before_join_asks_to_join() {
        let mut app = test_app();
        assert!(update(&mut app, Action::Submit("hi".into())).is_empty());
        assert!(app.status_message.contains("/join"));
    }

    // ========================================================================
    // Reconciliation
    // ========================================================================

    #[test]
    fn test_offline_compose_then_confirm_yields_one_sent_entry() {
        let (mut app, id) = joined_app("1");
        update(&mut app, Action::Submit("hi".into()));
        let temp_id = app.session.as_ref().unwrap().queue.queued().next().unwrap().temp_id.clone();
        assert_eq!(
            app.session.as_ref().unwrap().view.find_by_temp_id(&temp_id).unwrap().status,
            MessageStatus::Pending
        );

        update(&mut app, Action::TransportOpened(id));
        frame(&mut app, id, r#"{"type":"history","messages":[]}"#);
        frame(
            &mut app,
            id,
            &format!(
                r#"{{"type":"chat_message","id":"42","tempId":"{temp_id}","sender":"alice","content":"hi","timestamp":"2024-05-01T10:00:00"}}"#
            ),
        );

        let session = app.session.as_ref().unwrap();
        assert_eq!(session.view.count_chat(|_| true), 1);
        let msg = session.view.find_by_id("42").unwrap();
        assert_eq!(msg.status, MessageStatus::Sent);
        assert!(session.queue.is_empty());
    }

    #[test]
    fn test_confirmation_without_pending_entry_appends_sent() {
        let (mut app, id) = open_app("1");
        frame(
            &mut app,
            id,
            r#"{"type":"chat_message","id":5,"tempId":"gone","sender":"alice","content":"x"}"#,
        );
        let session = app.session.as_ref().unwrap();
        assert_eq!(session.view.find_by_id("5").unwrap().status, MessageStatus::Sent);
    }

    #[test]
    fn test_own_echo_without_temp_id_is_suppressed() {
        let (mut app, id) = open_app("1");
        let effects = frame(
            &mut app,
            id,
            r#"{"type":"chat_message","id":9,"sender":"alice","content":"echo"}"#,
        );
        assert!(effects.is_empty());
        assert!(app.session.as_ref().unwrap().view.is_empty());
    }

    #[test]
    fn test_incoming_message_is_rendered_and_marked_seen() {
        let (mut app, id) = open_app("1");
        let effects = frame(
            &mut app,
            id,
            r#"{"type":"chat_message","id":11,"sender":"bob","content":"hey"}"#,
        );
        assert_eq!(
            effects,
            vec![Effect::Send {
                connection: id,
                frame: ClientFrame::seen("11"),
            }]
        );
        assert_eq!(app.session.as_ref().unwrap().view.find_by_id("11").unwrap().sender, "bob");
    }

    #[test]
    fn test_other_users_temp_id_is_treated_as_incoming() {
        let (mut app, id) = open_app("1");
        let effects = frame(
            &mut app,
            id,
            r#"{"type":"chat_message","id":12,"tempId":"theirs","sender":"bob","content":"yo"}"#,
        );
        assert_eq!(effects.len(), 1);
        assert!(app.session.as_ref().unwrap().view.find_by_id("12").is_some());
    }

    #[test]
    fn test_history_replaces_message_list() {
        let (mut app, id) = open_app("1");
        frame(&mut app, id, r#"{"type":"system","message":"bob joined the room."}"#);
        frame(
            &mut app,
            id,
            r#"{"type":"history","messages":[{"id":1,"sender":"bob","content":"a"},{"id":2,"sender":"carol","content":"b"}]}"#,
        );
        let view = &app.session.as_ref().unwrap().view;
        assert_eq!(view.len(), 2);
        assert!(view.find_by_id("1").is_some());
        assert!(view.find_by_id("2").is_some());
    }

    #[test]
    fn test_history_keeps_unconfirmed_sends_visible() {
        let (mut app, id) = open_app("1");
        update(&mut app, Action::Submit("in flight".into()));
        frame(&mut app, id, r#"{"type":"history","messages":[{"id":1,"sender":"bob","content":"a"}]}"#);
        let view = &app.session.as_ref().unwrap().view;
        assert_eq!(view.len(), 2);
        assert_eq!(view.count_chat(|m| m.status == MessageStatus::Pending), 1);
    }

    #[test]
    fn test_history_releases_send_lost_to_a_disconnect() {
        let (mut app, id) = open_app("1");
        update(&mut app, Action::Submit("hi".into()));
        update(&mut app, Action::TransportClosed(id));

        let id = opened_id(&update(&mut app, Action::Reconnect));
        update(&mut app, Action::TransportOpened(id));
        let history = r#"{"type":"history","messages":[{"id":42,"sender":"alice","content":"hi"}]}"#;
        frame(&mut app, id, history);
        frame(&mut app, id, history);

        let session = app.session.as_ref().unwrap();
        assert_eq!(session.view.count_chat(|m| m.content == "hi"), 1);
        assert_eq!(session.view.count_chat(|m| m.status == MessageStatus::Pending), 0);
        assert_eq!(session.queue.in_flight_len(), 0);
        assert!(session.view.find_by_id("42").is_some());
    }

    #[test]
    fn test_history_without_lost_send_keeps_it_pending() {
        let (mut app, id) = open_app("1");
        update(&mut app, Action::Submit("hi".into()));
        frame(
            &mut app,
            id,
            r#"{"type":"history","messages":[{"id":41,"sender":"alice","content":"earlier"}]}"#,
        );

        let session = app.session.as_ref().unwrap();
        assert_eq!(session.queue.in_flight_len(), 1);
        assert_eq!(session.view.count_chat(|m| m.status == MessageStatus::Pending), 1);
    }

    #[test]
    fn test_seen_update_marks_own_message() {
        let (mut app, id) = open_app("1");
        frame(&mut app, id, r#"{"type":"history","messages":[{"id":3,"sender":"alice","content":"mine"}]}"#);
        frame(
            &mut app,
            id,
            r#"{"type":"seen_update","message_id":3,"seen_by":"bob","seen_at":"2024-05-01T10:02:00"}"#,
        );
        let msg = app.session.as_ref().unwrap().view.find_by_id("3").unwrap().clone();
        assert_eq!(msg.status, MessageStatus::Seen);
        assert_eq!(msg.receipt.unwrap().seen_by, "bob");
    }

    #[test]
    fn test_server_error_raises_notice_until_dismissed() {
        let (mut app, id) = open_app("1");
        frame(&mut app, id, r#"{"type":"error","message":"You are not a member of this room."}"#);
        assert_eq!(app.notice.as_deref(), Some("You are not a member of this room."));
        update(&mut app, Action::DismissNotice);
        assert!(app.notice.is_none());
    }

    #[test]
    fn test_unrecognized_and_non_json_frames_render_generically() {
        let (mut app, id) = open_app("1");
        frame(&mut app, id, r#"{"type":"reaction","message":"bob reacted"}"#);
        frame(&mut app, id, r#"{"hello":"world"}"#);
        frame(&mut app, id, "plain text");

        let entries = app.session.as_ref().unwrap().view.entries().to_vec();
        assert_eq!(
            entries,
            vec![
                Entry::Generic("bob reacted".into()),
                Entry::Generic(r#"{"hello":"world"}"#.into()),
                Entry::Generic("plain text".into()),
            ]
        );
    }

    // ========================================================================
    // Typing
    // ========================================================================

    fn typing_frames(effects: &[Effect]) -> Vec<TypingStatus> {
        effects
            .iter()
            .filter_map(|e| match e {
                Effect::Send {
                    frame: ClientFrame::Control(crate::core::protocol::ControlFrame::Typing { status }),
                    ..
                } => Some(*status),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_keystrokes_start_once_and_idle_stops() {
        let (mut app, _) = open_app("1");
        let mut effects = Vec::new();
        for _ in 0..4 {
            effects.extend(update(&mut app, Action::Keystroke));
        }
        assert_eq!(typing_frames(&effects), vec![TypingStatus::Start]);

        let generation = scheduled_generation(&effects).unwrap();
        let effects = update(&mut app, Action::TypingIdle(generation));
        assert_eq!(typing_frames(&effects), vec![TypingStatus::Stop]);
    }

    #[test]
    fn test_submit_stops_typing_before_idle() {
        let (mut app, _) = open_app("1");
        update(&mut app, Action::Keystroke);
        let effects = update(&mut app, Action::Submit("done".into()));
        assert_eq!(typing_frames(&effects), vec![TypingStatus::Stop]);
        assert!(effects.contains(&Effect::CancelTypingIdle));
    }

    fn scheduled_generation(effects: &[Effect]) -> Option<u64> {
        effects.iter().rev().find_map(|e| match e {
            Effect::ScheduleTypingIdle { generation, .. } => Some(*generation),
            _ => None,
        })
    }

    #[test]
    fn test_keystrokes_while_connecting_are_not_tracked() {
        let (mut app, id) = joined_app("1");
        assert!(update(&mut app, Action::Keystroke).is_empty());
        assert!(!app.session.as_ref().unwrap().typing.is_typing());

        update(&mut app, Action::TransportOpened(id));
        let mut wire = Vec::new();
        let effects = update(&mut app, Action::Keystroke);
        wire.extend(typing_frames(&effects));
        let generation = scheduled_generation(&effects).unwrap();
        wire.extend(typing_frames(&update(&mut app, Action::TypingIdle(generation))));

        assert_eq!(wire, vec![TypingStatus::Start, TypingStatus::Stop]);
    }

    #[test]
    fn test_typing_generations_are_not_reused_across_rooms() {
        let (mut app, _) = open_app("1");
        let old = scheduled_generation(&update(&mut app, Action::Keystroke)).unwrap();

        let new = opened_id(&update(&mut app, Action::JoinRoom("2".into())));
        update(&mut app, Action::TransportOpened(new));
        let current = scheduled_generation(&update(&mut app, Action::Keystroke)).unwrap();
        assert_ne!(old, current);

        // The old room's timer was already queued when it was aborted.
        assert!(update(&mut app, Action::TypingIdle(old)).is_empty());
        assert!(app.session.as_ref().unwrap().typing.is_typing());
    }

    #[test]
    fn test_typing_update_excludes_local_user() {
        let (mut app, id) = open_app("1");
        frame(&mut app, id, r#"{"type":"typing_update","users":["alice","bob"]}"#);
        assert_eq!(
            app.session.as_ref().unwrap().typing_line.as_deref(),
            Some("bob is typing…")
        );
        frame(&mut app, id, r#"{"type":"typing_update","users":["alice"]}"#);
        assert_eq!(app.session.as_ref().unwrap().typing_line, None);
    }

    #[test]
    fn test_disconnect_resets_typing_and_presence() {
        let (mut app, id) = open_app("1");
        update(&mut app, Action::Keystroke);
        frame(&mut app, id, r#"{"type":"typing_update","users":["bob"]}"#);

        let effects = update(&mut app, Action::TransportClosed(id));

        assert!(effects.contains(&Effect::CancelTypingIdle));
        let session = app.session.as_ref().unwrap();
        assert!(!session.typing.is_typing());
        assert!(session.typing_line.is_none());
    }

    #[test]
    fn test_quit_command_and_action() {
        let mut app = test_app();
        assert_eq!(update(&mut app, Action::Submit("/quit".into())), vec![Effect::Quit]);
        assert_eq!(update(&mut app, Action::Quit), vec![Effect::Quit]);
    }

    #[test]
    fn test_unknown_command_reports_status() {
        let mut app = test_app();
        assert!(update(&mut app, Action::Submit("/dance".into())).is_empty());
        assert_eq!(app.status_message, "Unknown command: /dance");
    }
}
