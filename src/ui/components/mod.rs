//! Reusable UI components for the chat window

pub mod input_bar;
pub mod markdown_view;
pub mod message_list;

pub use input_bar::{InputAction, InputBar};
pub use markdown_view::MarkdownView;
pub use message_list::MessageList;
