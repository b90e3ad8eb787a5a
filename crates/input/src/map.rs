//! Key mapping from terminal events to quiz actions.

use crate::types::QuizAction;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Map keyboard input to quiz actions.
pub fn handle_key_event(key: KeyEvent) -> Option<QuizAction> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return None;
    }

    match key.code {
        // "The proposed result is right"
        KeyCode::Left
        | KeyCode::Char('t')
        | KeyCode::Char('T')
        | KeyCode::Char('y')
        | KeyCode::Char('Y') => Some(QuizAction::AnswerTrue),

        // "The proposed result is wrong"
        KeyCode::Right
        | KeyCode::Char('f')
        | KeyCode::Char('F')
        | KeyCode::Char('n')
        | KeyCode::Char('N') => Some(QuizAction::AnswerFalse),

        KeyCode::Enter | KeyCode::Char('r') | KeyCode::Char('R') => Some(QuizAction::Replay),

        _ => None,
    }
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc)
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}
