use ratatui::Frame;
use ratatui::layout::Rect;

/// A piece of the chat screen.
///
/// Components receive their data as struct fields (props) and may borrow
/// persistent state owned by `TuiState`. They are rebuilt every frame.
///
/// `render` takes `&mut self` so a component can update the state it
/// borrows while drawing (measured heights, scroll offsets).
pub trait Component {
    fn render(&mut self, frame: &mut Frame, area: Rect);
}

/// A component that handles terminal events.
pub trait EventHandler {
    /// The type of high-level event this component emits.
    type Event;

    /// Handle a low-level `TuiEvent` and optionally return a high-level event.
    fn handle_event(&mut self, event: &super::event::TuiEvent) -> Option<Self::Event>;
}
