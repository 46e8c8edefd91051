//! # MessageList Component
//!
//! Scrollable view of the room's messages.
//!
//! ## Responsibilities
//!
//! - Display the entries of the current `MessageView`
//! - Stick to the newest message unless the user scrolled away
//! - Only render entries near the viewport
//!
//! ## Architecture
//!
//! `MessageList` is a transient component (created each frame) that wraps
//! `&'a mut MessageListState` (persistent state) and the `MessageView` (props).
//! Entries are edited in place (pending → sent → seen), so heights are
//! measured every frame rather than cached by count.

use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::renderer::MessageView;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::message::ChatLine;
use crate::tui::event::TuiEvent;

/// Layout and scroll state for the message list.
/// Must be persisted in the parent TuiState.
pub struct MessageListState {
    pub scroll_state: ScrollViewState,
    /// Running totals of entry heights, as of the last frame.
    pub prefix_heights: Vec<u16>,
    /// When true, auto-scroll to bottom on new content
    pub stick_to_bottom: bool,
    /// Last known viewport height (for scroll clamping between frames)
    pub viewport_height: u16,
}

impl Default for MessageListState {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageListState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            prefix_heights: Vec::new(),
            stick_to_bottom: true, // Start attached to bottom
            viewport_height: 0,
        }
    }

    fn total_height(&self) -> u16 {
        self.prefix_heights.last().copied().unwrap_or(0)
    }

    /// Whether there is content below the viewport.
    pub fn has_unseen_content(&self) -> bool {
        let max_y = self.total_height().saturating_sub(self.viewport_height);
        !self.stick_to_bottom && self.scroll_state.offset().y < max_y
    }

    /// Clamp scroll offset so it never exceeds the content bounds.
    pub fn clamp_scroll(&mut self) {
        let max_y = self.total_height().saturating_sub(self.viewport_height);
        let current = self.scroll_state.offset();
        if current.y > max_y {
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// Re-engage auto-scroll once the user has scrolled back to the bottom.
    pub fn repin_if_at_bottom(&mut self) {
        let max_y = self.total_height().saturating_sub(self.viewport_height);
        let current = self.scroll_state.offset();
        if current.y >= max_y {
            self.stick_to_bottom = true;
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// Indices of entries intersecting the viewport plus half a screen of
    /// buffer on each side.
    pub fn visible_range(&self, scroll_offset: u16, viewport_height: u16) -> std::ops::Range<usize> {
        let buffer = viewport_height / 2;
        let buffered_start = scroll_offset.saturating_sub(buffer);
        let buffered_end = scroll_offset
            .saturating_add(viewport_height)
            .saturating_add(buffer);

        let start = self
            .prefix_heights
            .partition_point(|&end| end <= buffered_start);
        let end = self
            .prefix_heights
            .partition_point(|&end| end < buffered_end)
            .saturating_add(1)
            .min(self.prefix_heights.len());

        start..end
    }
}

/// Scrollable message view component.
/// Created fresh each frame with references to state and data.
pub struct MessageList<'a> {
    pub state: &'a mut MessageListState,
    pub view: Option<&'a MessageView>,
}

impl<'a> MessageList<'a> {
    pub fn new(state: &'a mut MessageListState, view: Option<&'a MessageView>) -> Self {
        Self { state, view }
    }
}

impl<'a> Component for MessageList<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let content_width = area.width.saturating_sub(1); // -1 for scrollbar
        let entries = self.view.map(MessageView::entries).unwrap_or_default();

        // 1. Measure
        self.state.prefix_heights = match self.view {
            Some(view) => entries
                .iter()
                .scan(0u16, |acc, entry| {
                    *acc = acc.saturating_add(ChatLine::new(entry, view).calculate_height(content_width));
                    Some(*acc)
                })
                .collect(),
            None => Vec::new(),
        };
        let total_height = self.state.total_height();

        // 2. Clamp
        self.state.viewport_height = area.height;
        if !self.state.stick_to_bottom {
            self.state.clamp_scroll();
        }

        // 3. Render visible entries into a ScrollView
        let mut scroll_view = ScrollView::new(Size::new(content_width, total_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        if let Some(view) = self.view {
            let scroll_offset = self.state.scroll_state.offset().y;
            for i in self.state.visible_range(scroll_offset, area.height) {
                let top = if i == 0 { 0 } else { self.state.prefix_heights[i - 1] };
                let height = self.state.prefix_heights[i] - top;
                let rect = Rect::new(0, top, content_width, height);
                scroll_view.render_widget(ChatLine::new(&entries[i], view), rect);
            }
        }

        if self.state.stick_to_bottom {
            self.state.scroll_state.scroll_to_bottom();
        }

        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);
    }
}

/// Scroll handling lives on the persistent state, not the per-frame component.
impl EventHandler for MessageListState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp => {
                self.scroll_state.scroll_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollDown => {
                self.scroll_state.scroll_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollPageUp => {
                self.scroll_state.scroll_page_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollPageDown => {
                self.scroll_state.scroll_page_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollToBottom => {
                self.stick_to_bottom = true;
            }
            _ => {}
        }
        None
    }
}
