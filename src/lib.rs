//! TUI Quiz (workspace facade crate).
//!
//! Exposes the member crates as `tui_quiz::{core, adapter, term, input, types}`
//! while the implementation lives in dedicated crates under `crates/`.

pub use tui_quiz_adapter as adapter;
pub use tui_quiz_core as core;
pub use tui_quiz_input as input;
pub use tui_quiz_term as term;
pub use tui_quiz_types as types;
