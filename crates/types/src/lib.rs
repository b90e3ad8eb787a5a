//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the quiz.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (session engine, terminal rendering, remote protocol).
//!
//! # Question Shape
//!
//! Every question is `<left> <op> <right>` where both operands have exactly
//! [`OPERAND_DIGITS`] decimal digits and `<op>` is one of [`Operator::ALL`].
//! A proposed result is shown next to the question; it is either the true
//! result or the true result shifted by a nonzero delta in
//! `[DELTA_MIN, DELTA_MAX)`.
//!
//! # Timing Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 1000 | Countdown cadence |
//! | `SESSION_DURATION_SECS` | 20 | Ticks until game over |
//! | `FRAME_MS` | 50 | Terminal input poll / redraw interval |
//! | `STATIC_REDRAW_MS` | 250 | Max redraw rate for an unchanged screen |
//!
//! # Scoring
//!
//! A correct judgement adds [`SCORE_PER_CORRECT`] points and [`LEVEL_PER_CORRECT`]
//! level. A wrong judgement changes nothing.
//!
//! # Examples
//!
//! ```
//! use tui_quiz_types::{Operator, QuizAction, SessionPhase};
//!
//! let op = Operator::from_str("mul").unwrap();
//! assert_eq!(op.symbol(), '*');
//!
//! let action = QuizAction::from_str("answerFalse").unwrap();
//! assert_eq!(action, QuizAction::AnswerFalse);
//!
//! assert_eq!(SessionPhase::GameOver.as_str(), "game_over");
//! ```

/// Decimal digit count of every operand.
pub const OPERAND_DIGITS: u32 = 3;

/// Perturbation range for a wrong hypothesis, half-open `[DELTA_MIN, DELTA_MAX)`.
pub const DELTA_MIN: i64 = -10;
pub const DELTA_MAX: i64 = 10;

/// Session countdown.
pub const SESSION_DURATION_SECS: u32 = 20;
pub const TICK_MS: u32 = 1000;

/// Terminal loop timing (milliseconds).
pub const FRAME_MS: u32 = 50;
pub const STATIC_REDRAW_MS: u64 = 250;

/// Scoring per correct judgement.
pub const SCORE_PER_CORRECT: u32 = 5;
pub const LEVEL_PER_CORRECT: u32 = 1;

/// Stats at session start.
pub const INITIAL_SCORE: u32 = 0;
pub const INITIAL_LEVEL: u32 = 1;

/// Arithmetic operators a question can use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Sub,
    Mul,
}

impl Operator {
    /// Default candidate set for question generation.
    pub const ALL: [Operator; 3] = [Operator::Add, Operator::Sub, Operator::Mul];

    /// Parse operator from its name or symbol (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "add" | "+" => Some(Operator::Add),
            "sub" | "-" => Some(Operator::Sub),
            "mul" | "*" => Some(Operator::Mul),
            _ => None,
        }
    }

    /// Convert to lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Add => "add",
            Operator::Sub => "sub",
            Operator::Mul => "mul",
        }
    }

    /// Symbol used in question text
    pub fn symbol(&self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Sub => '-',
            Operator::Mul => '*',
        }
    }
}

/// Lifecycle of a quiz session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SessionPhase {
    #[default]
    NotStarted,
    Running,
    GameOver,
}

impl SessionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionPhase::NotStarted => "not_started",
            SessionPhase::Running => "running",
            SessionPhase::GameOver => "game_over",
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, SessionPhase::Running)
    }
}

/// Player actions (terminal keys and remote commands map onto these).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizAction {
    AnswerTrue,
    AnswerFalse,
    Replay,
}

impl QuizAction {
    /// Parse action from string (for the remote protocol)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "answertrue" => Some(QuizAction::AnswerTrue),
            "answerfalse" => Some(QuizAction::AnswerFalse),
            "replay" => Some(QuizAction::Replay),
            _ => None,
        }
    }

    /// Convert to string
    pub fn as_str(&self) -> &'static str {
        match self {
            QuizAction::AnswerTrue => "answerTrue",
            QuizAction::AnswerFalse => "answerFalse",
            QuizAction::Replay => "replay",
        }
    }

    /// The verdict carried by an answer action.
    pub fn verdict(&self) -> Option<bool> {
        match self {
            QuizAction::AnswerTrue => Some(true),
            QuizAction::AnswerFalse => Some(false),
            QuizAction::Replay => None,
        }
    }
}
