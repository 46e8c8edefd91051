use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget, Wrap};

use crate::core::message::{Message, format_timestamp_in};
use crate::core::renderer::{Entry, MessageView};

/// A stateless component that renders one message-list entry.
///
/// # Design
///
/// `ChatLine` is a **transient component**: it's created fresh each frame
/// with the entry and the view it belongs to. The view supplies the labels
/// that depend on local identity ("You", status annotation).
///
/// # Styling
///
/// - **Own messages** (green sender): `[time] You: text · status`
/// - **Others** (cyan sender): `[time] bob: text`
/// - **System** (dark gray, italic): `bob joined the room. (time)`
/// - **Generic** (yellow): raw text of a frame the client doesn't understand
///
/// # Height Calculation
///
/// [`calculate_height`](Self::calculate_height) predicts the wrapped height
/// with `textwrap` options that match the `Paragraph` wrapping used when
/// rendering, so the list can lay out entries without drawing them.
#[derive(Clone, Copy)]
pub struct ChatLine<'a> {
    pub entry: &'a Entry,
    pub view: &'a MessageView,
}

impl<'a> ChatLine<'a> {
    pub fn new(entry: &'a Entry, view: &'a MessageView) -> Self {
        Self { entry, view }
    }

    /// Rows needed to show this entry at `width`. Always at least 1.
    pub fn calculate_height(&self, width: u16) -> u16 {
        if width == 0 {
            return 1;
        }
        let text = self.plain_text();
        let options = textwrap::Options::new(width as usize)
            .break_words(true)
            .word_separator(textwrap::WordSeparator::AsciiSpace);
        (textwrap::wrap(&text, options).len() as u16).max(1)
    }

    fn plain_text(&self) -> String {
        self.line()
            .spans
            .iter()
            .map(|span| span.content.as_ref())
            .collect()
    }

    pub fn line(&self) -> Line<'a> {
        match self.entry {
            Entry::Chat(message) => self.chat_line(message),
            Entry::System { text, timestamp } => {
                let style = Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC);
                let mut spans = vec![Span::styled(text.as_str(), style)];
                if let Some(time) = timestamp
                    .as_deref()
                    .and_then(|raw| format_timestamp_in(raw, &chrono::Local))
                {
                    spans.push(Span::styled(format!(" ({time})"), style));
                }
                Line::from(spans)
            }
            Entry::Generic(text) => Line::from(Span::styled(
                text.as_str(),
                Style::default().fg(Color::Yellow),
            )),
        }
    }

    fn chat_line(&self, message: &'a Message) -> Line<'a> {
        let dim = Style::default().fg(Color::DarkGray);
        let sender = self.view.sender_label(message);
        let sender_style = if self.view.status_label(message).is_some() {
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        };

        let mut spans = Vec::with_capacity(5);
        if let Some(time) = message.display_timestamp() {
            spans.push(Span::styled(format!("[{time}] "), dim));
        }
        spans.push(Span::styled(format!("{sender}:"), sender_style));
        spans.push(Span::raw(format!(" {}", message.content)));
        if let Some(status) = self.view.status_label(message) {
            spans.push(Span::styled(
                format!(" · {status}"),
                dim.add_modifier(Modifier::ITALIC),
            ));
        }
        Line::from(spans)
    }
}

impl<'a> Widget for ChatLine<'a> {
    fn render(self, area: Rect, buf: &mut ratatui::buffer::Buffer) {
        Paragraph::new(self.line())
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }
}
