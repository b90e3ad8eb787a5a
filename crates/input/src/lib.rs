//! Terminal input module.
//!
//! Maps `crossterm` key events into [`crate::types::QuizAction`]. Kept apart
//! from the terminal renderer so key bindings can be tested without a TTY.

pub mod map;

pub use tui_quiz_types as types;

pub use map::{handle_key_event, should_quit};
