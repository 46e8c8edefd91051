//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Event Loop
//!
//! One thread owns the `App`. Each turn it:
//!
//! 1. draws, if anything changed since the last frame
//! 2. waits briefly for terminal input, then drains whatever else is pending
//! 3. drains the action channel fed by the transport task and typing timer
//!
//! Every `Action` goes through `core::update`, and the returned effects go to
//! the [`Runtime`].
//!
//! A `SteadyBlock` cursor style is used instead of a blinking cursor because
//! ratatui's `set_cursor_position` resets the terminal's blink timer on every
//! `draw()` call.

mod component;
mod components;
mod event;
mod ui;

use log::{debug, info};
use std::io::stdout;
use std::sync::mpsc;
use std::time::Duration;

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;

use crate::core::action::{Action, update};
use crate::core::config::ResolvedConfig;
use crate::core::state::App;
use crate::runtime::Runtime;
use crate::tui::component::EventHandler;
use crate::tui::components::{InputBox, InputEvent, MessageListState};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// Upper bound on how long socket traffic waits before it is drawn.
const POLL_TIMEOUT: Duration = Duration::from_millis(50);

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub message_list: MessageListState,
    pub input_box: InputBox,
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            message_list: MessageListState::new(),
            input_box: InputBox::new(),
        }
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Kitty keyboard protocol is ignored by terminals that don't support it
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, steady block cursor, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            DisableBracketedPaste,
            Hide
        );
    }
}

/// Translate one terminal event into a core action, or handle it locally.
fn route_event(event: TuiEvent, app: &App, tui: &mut TuiState) -> Option<Action> {
    match event {
        TuiEvent::Resize => None,
        // Ctrl+C always quits, even over a notice
        TuiEvent::ForceQuit => Some(Action::Quit),
        // A notice blocks everything until dismissed
        TuiEvent::Submit | TuiEvent::Escape if app.notice.is_some() => Some(Action::DismissNotice),
        _ if app.notice.is_some() => None,
        TuiEvent::Escape => Some(Action::Quit),
        TuiEvent::ScrollUp
        | TuiEvent::ScrollDown
        | TuiEvent::ScrollPageUp
        | TuiEvent::ScrollPageDown
        | TuiEvent::ScrollToBottom => {
            tui.message_list.handle_event(&event);
            None
        }
        _ => match tui.input_box.handle_event(&event)? {
            InputEvent::Submit(text) => Some(Action::Submit(text)),
            InputEvent::ContentChanged => Some(Action::Keystroke),
            InputEvent::CursorMoved => None,
        },
    }
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let mut app = App::from_config(&config);
    let mut tui = TuiState::new();

    // Channel for actions from the transport task and typing timer
    let (tx, rx) = mpsc::channel();
    let mut runtime = Runtime::new(tx);

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    if let Some(room) = config.default_room.clone() {
        info!("Joining default room {}", room);
        runtime.apply(update(&mut app, Action::JoinRoom(room)));
    }

    let mut needs_redraw = true; // Force first frame
    let mut current_room = app.room_id().map(str::to_string);

    'main: loop {
        // New room, new scroll position
        if app.room_id() != current_room.as_deref() {
            current_room = app.room_id().map(str::to_string);
            tui.message_list = MessageListState::new();
        }
        // Rendering anything pins the list to the newest message
        if let Some(session) = app.session.as_mut()
            && session.view.take_scroll_request()
        {
            tui.message_list.stick_to_bottom = true;
        }

        if needs_redraw {
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui))?;
            needs_redraw = false;
        }

        let first_event = poll_event_timeout(POLL_TIMEOUT);
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            needs_redraw = true;
            if let Some(action) = route_event(event, &app, &mut tui)
                && runtime.apply(update(&mut app, action))
            {
                break 'main;
            }
        }

        // Drain actions from background tasks
        while let Ok(action) = rx.try_recv() {
            debug!("Background action: {:?}", action);
            needs_redraw = true;
            if runtime.apply(update(&mut app, action)) {
                break 'main;
            }
        }
    }

    info!("Shutting down");
    runtime.shutdown();
    ratatui::restore();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{open_app, test_app};

    #[test]
    fn typing_a_char_is_a_keystroke() {
        let app = test_app();
        let mut tui = TuiState::new();
        assert_eq!(
            route_event(TuiEvent::InputChar('h'), &app, &mut tui),
            Some(Action::Keystroke)
        );
        assert_eq!(route_event(TuiEvent::CursorLeft, &app, &mut tui), None);
    }

    #[test]
    fn enter_submits_buffer() {
        let (app, _) = open_app("lobby");
        let mut tui = TuiState::new();
        route_event(TuiEvent::Paste("hello".into()), &app, &mut tui);
        assert_eq!(
            route_event(TuiEvent::Submit, &app, &mut tui),
            Some(Action::Submit("hello".into()))
        );
    }

    #[test]
    fn notice_swallows_input_until_dismissed() {
        let mut app = test_app();
        app.notice = Some("Room is full".into());
        let mut tui = TuiState::new();

        assert_eq!(route_event(TuiEvent::InputChar('x'), &app, &mut tui), None);
        assert!(tui.input_box.buffer.is_empty());
        assert_eq!(
            route_event(TuiEvent::Escape, &app, &mut tui),
            Some(Action::DismissNotice)
        );
        assert_eq!(
            route_event(TuiEvent::ForceQuit, &app, &mut tui),
            Some(Action::Quit)
        );
    }

    #[test]
    fn escape_quits_without_notice() {
        let app = test_app();
        let mut tui = TuiState::new();
        assert_eq!(route_event(TuiEvent::Escape, &app, &mut tui), Some(Action::Quit));
    }

    #[test]
    fn scroll_keys_stay_in_the_tui() {
        let app = test_app();
        let mut tui = TuiState::new();
        assert_eq!(route_event(TuiEvent::ScrollPageUp, &app, &mut tui), None);
        assert!(!tui.message_list.stick_to_bottom);
    }
}
