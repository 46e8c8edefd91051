//! # TUI Components
//!
//! UI pieces of the chat screen.
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! - `TitleBar`: room, connection state, queued count, status
//! - `ChatLine`: one entry of the message list
//! - `TypingIndicator`: the "… is typing" line
//! - `Notice`: blocking server error popup
//!
//! ### Stateful Components (Event-Driven)
//!
//! - `InputBox`: compose field
//! - `MessageList`: scrollable message view
//!
//! Each file holds the component's state, events, rendering and tests.
//!
//! ```text
//! components/
//! ├── mod.rs
//! ├── title_bar.rs
//! ├── message.rs
//! ├── message_list.rs
//! ├── typing_indicator.rs
//! ├── notice.rs
//! └── input_box/
//! ```

mod title_bar;
pub use title_bar::TitleBar;

pub mod input_box;
pub mod message;
pub use input_box::{InputBox, InputEvent};
pub mod message_list;
pub use message_list::{MessageList, MessageListState};
mod notice;
pub use notice::Notice;
mod typing_indicator;
pub use typing_indicator::TypingIndicator;
