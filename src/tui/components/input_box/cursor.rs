//! Cursor position and row scrolling for the InputBox.
//!
//! `CursorState` owns the cursor byte offset and the first visible row.
//! Methods take the buffer explicitly; the text itself belongs to `InputBox`.

use super::text_wrap::{CONTENT_OFFSET, MAX_VISIBLE_LINES, cell_of, inner_width};
use ratatui::layout::Rect;

pub(super) struct CursorState {
    /// Cursor position as byte offset in buffer (0..=buffer.len())
    pub pos: usize,
    /// First visible row (0 when content fits)
    pub scroll_offset: u16,
}

impl CursorState {
    pub fn new() -> Self {
        Self {
            pos: 0,
            scroll_offset: 0,
        }
    }

    /// Reset cursor to start (used after Submit clears the buffer).
    pub fn reset(&mut self) {
        self.pos = 0;
        self.scroll_offset = 0;
    }

    /// Keep the cursor row inside the visible window.
    pub fn update_scroll_offset(&mut self, buffer: &str, content_width: u16) {
        let (row, _) = cell_of(buffer, self.pos, inner_width(content_width));
        if row < self.scroll_offset {
            self.scroll_offset = row;
        } else if row >= self.scroll_offset + MAX_VISIBLE_LINES {
            self.scroll_offset = row + 1 - MAX_VISIBLE_LINES;
        }
    }

    /// Terminal cell of the cursor inside the box at `area`.
    pub fn screen_pos(&self, buffer: &str, area: Rect) -> (u16, u16) {
        let (row, col) = cell_of(buffer, self.pos, inner_width(area.width));
        let x = area.x + CONTENT_OFFSET + col;
        let y = area.y + 1 + row.saturating_sub(self.scroll_offset);
        (x, y)
    }
}
