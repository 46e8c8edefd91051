//! Row layout for the compose buffer.
//!
//! The buffer is broken into rows by display width (hard wrap, no word
//! breaking), so a byte offset maps to exactly one screen cell.

use unicode_width::UnicodeWidthChar;

/// Border (2) + padding (2) consumed horizontally by the bordered block
pub(super) const HORIZONTAL_OVERHEAD: u16 = 4;
/// Top + bottom borders consumed vertically
pub(super) const VERTICAL_OVERHEAD: u16 = 2;
/// Maximum visible content rows before internal scrolling kicks in
pub(super) const MAX_VISIBLE_LINES: u16 = 3;
/// Offset from area edge to content (border + padding)
pub(super) const CONTENT_OFFSET: u16 = 2;

/// Inner content width after subtracting border/padding overhead.
pub(super) fn inner_width(content_width: u16) -> u16 {
    content_width.saturating_sub(HORIZONTAL_OVERHEAD)
}

fn char_width(c: char) -> u16 {
    c.width().unwrap_or(0) as u16
}

/// Byte ranges of each row. Always at least one (possibly empty) row.
pub(super) fn rows(text: &str, width: u16) -> Vec<std::ops::Range<usize>> {
    let mut rows = Vec::new();
    let mut start = 0;
    let mut used = 0u16;
    if width > 0 {
        for (i, c) in text.char_indices() {
            let w = char_width(c);
            if used + w > width && used > 0 {
                rows.push(start..i);
                start = i;
                used = 0;
            }
            used += w;
        }
    }
    rows.push(start..text.len());
    rows
}

/// Row and column (in cells) of the byte offset `pos`.
///
/// A cursor sitting exactly at a full row's end wraps to the next row so it
/// stays inside the box.
pub(super) fn cell_of(text: &str, pos: usize, width: u16) -> (u16, u16) {
    let rows = rows(text, width);
    let row = rows
        .iter()
        .rposition(|r| r.start <= pos)
        .unwrap_or(0);
    let col: u16 = text[rows[row].start..pos].chars().map(char_width).sum();
    if width > 0 && col >= width {
        return (row as u16 + 1, 0);
    }
    (row as u16, col)
}

/// Number of rows the cursor may occupy, including a trailing wrap row.
pub(super) fn row_count(text: &str, width: u16) -> u16 {
    let (cursor_row, _) = cell_of(text, text.len(), width);
    (rows(text, width).len() as u16).max(cursor_row + 1)
}

/// Find the byte offset of the previous character boundary before `pos` in `text`.
pub(super) fn prev_char_boundary(text: &str, pos: usize) -> usize {
    text[..pos]
        .char_indices()
        .next_back()
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Find the byte offset of the next character boundary after `pos` in `text`.
pub(super) fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .char_indices()
        .nth(1)
        .map(|(i, _)| pos + i)
        .unwrap_or(text.len())
}
