//! Blocking notice popup for server errors.
//!
//! Drawn centered over the message list until the user dismisses it with
//! Enter or Esc. While it is up the run loop swallows other input.

use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Clear, Paragraph, Wrap};

use crate::tui::component::Component;

const WIDTH: u16 = 50;

pub struct Notice<'a> {
    pub text: &'a str,
}

impl<'a> Notice<'a> {
    fn popup_area(&self, area: Rect) -> Rect {
        let width = WIDTH.min(area.width);
        let inner = width.saturating_sub(4).max(1) as usize;
        let text_rows = textwrap::wrap(self.text, inner).len().max(1) as u16;
        // Text, blank line, hint, borders
        let height = (text_rows + 4).min(area.height);

        let [row] = Layout::vertical([Constraint::Length(height)])
            .flex(Flex::Center)
            .areas(area);
        let [popup] = Layout::horizontal([Constraint::Length(width)])
            .flex(Flex::Center)
            .areas(row);
        popup
    }
}

impl<'a> Component for Notice<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let popup = self.popup_area(area);

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Red))
            .title(" Error ");

        let body = Paragraph::new(vec![
            Line::raw(self.text),
            Line::raw(""),
            Line::styled("Enter or Esc to dismiss", Style::default().fg(Color::DarkGray)),
        ])
        .wrap(Wrap { trim: true })
        .block(block);

        frame.render_widget(Clear, popup);
        frame.render_widget(body, popup);
    }
}
