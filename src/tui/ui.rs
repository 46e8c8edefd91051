use crate::core::connection::ConnectionState;
use crate::core::state::App;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{MessageList, Notice, TitleBar, TypingIndicator};

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};

/// Draw one frame.
///
/// ```text
/// ┌ title bar (1) ─────────────────────┐
/// │ message list (rest)                │
/// │ typing line (0 or 1)               │
/// │ input box (3..=5)                  │
/// └────────────────────────────────────┘
/// ```
///
/// A notice, if any, is drawn last over the message list.
pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState) {
    use Constraint::{Length, Min};

    let session = app.session.as_ref();
    let mut typing = TypingIndicator {
        text: session.and_then(|s| s.typing_line.as_deref()),
    };
    let input_height = tui.input_box.calculate_height(frame.area().width);

    let layout = Layout::vertical([
        Length(1),
        Min(0),
        Length(typing.height()),
        Length(input_height),
    ]);
    let [title_area, main_area, typing_area, input_area] = layout.areas(frame.area());

    let mut message_list = MessageList::new(&mut tui.message_list, session.map(|s| &s.view));
    message_list.render(frame, main_area);

    let mut title_bar = TitleBar {
        room: session.map(|s| s.room_id.clone()),
        state: session.map_or(ConnectionState::Closed, |s| s.connection_state()),
        queued: session.map_or(0, |s| s.queue.queued_len()),
        status_message: app.status_message.clone(),
        has_unseen_content: tui.message_list.has_unseen_content(),
    };
    title_bar.render(frame, title_area);

    typing.render(frame, typing_area);

    tui.input_box.dimmed = app.notice.is_some();
    tui.input_box.render(frame, input_area);

    if let Some(text) = app.notice.as_deref() {
        Notice { text }.render(frame, main_area);
    }
}
