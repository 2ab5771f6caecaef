//! egui/eframe chat window

mod app;
pub mod components;
mod theme;

pub use app::{run, ChatApp};
pub use components::{InputAction, InputBar, MarkdownView, MessageList};
pub use theme::Theme;
