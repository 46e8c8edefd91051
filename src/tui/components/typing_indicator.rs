use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;

use crate::tui::component::Component;

/// One dim line under the message list: "bob is typing…".
///
/// `text` is the line the core already worked out; `None` renders nothing.
pub struct TypingIndicator<'a> {
    pub text: Option<&'a str>,
}

impl<'a> TypingIndicator<'a> {
    /// Rows to reserve in the layout.
    pub fn height(&self) -> u16 {
        u16::from(self.text.is_some())
    }
}

impl<'a> Component for TypingIndicator<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        if let Some(text) = self.text {
            let style = Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC);
            frame.render_widget(Span::styled(text, style), area);
        }
    }
}
