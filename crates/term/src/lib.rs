//! Terminal rendering for the quiz.
//!
//! Renders into a simple framebuffer that is diffed and flushed to the
//! terminal, without a widget toolkit. `QuizView` is pure and unit-testable;
//! only `TerminalRenderer` performs I/O.

pub mod fb;
pub mod quiz_view;
pub mod render_throttle;
pub mod renderer;

pub use tui_quiz_core as core;
pub use tui_quiz_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use quiz_view::{QuizView, RemoteStatusView, Viewport};
pub use render_throttle::RenderThrottle;
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
