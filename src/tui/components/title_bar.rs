//! # TitleBar Component
//!
//! Top status bar: which room, whether the socket is up, how many messages
//! are waiting to go out, and the latest status line.
//!
//! Purely presentational. Every field is a prop filled in by `draw_ui`:
//!
//! ```rust,ignore
//! let mut title_bar = TitleBar {
//!     room: Some("lobby".into()),
//!     state: ConnectionState::Open,
//!     queued: 0,
//!     status_message: String::new(),
//!     has_unseen_content: false,
//! };
//! title_bar.render(frame, area);
//! ```
//!
//! Format: `roomchat #lobby · connected · 2 queued | status | ↓ New`

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::core::connection::ConnectionState;
use crate::tui::component::Component;

pub struct TitleBar {
    pub room: Option<String>,
    pub state: ConnectionState,
    /// Messages composed while offline, not yet sent
    pub queued: usize,
    pub status_message: String,
    /// Whether there's content below the current scroll position
    pub has_unseen_content: bool,
}

impl TitleBar {
    fn state_color(&self) -> Color {
        match self.state {
            ConnectionState::Open => Color::Green,
            ConnectionState::Connecting => Color::Yellow,
            ConnectionState::Closed => Color::Red,
        }
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![Span::raw("roomchat ")];
        match &self.room {
            Some(room) => {
                spans.push(Span::raw(format!("#{room} · ")));
                spans.push(Span::styled(
                    self.state.label(),
                    Style::default().fg(self.state_color()),
                ));
            }
            None => spans.push(Span::raw("(no room)")),
        }
        if self.queued > 0 {
            spans.push(Span::raw(format!(" · {} queued", self.queued)));
        }
        if !self.status_message.is_empty() {
            spans.push(Span::raw(format!(" | {}", self.status_message)));
        }
        if self.has_unseen_content {
            spans.push(Span::raw(" | ↓ New"));
        }

        frame.render_widget(Line::from(spans), area);
    }
}
