//! Scoring module - score and level bookkeeping
//!
//! Rules:
//! - A judgement matching the round's verdict adds `SCORE_PER_CORRECT` points
//!   and `LEVEL_PER_CORRECT` level.
//! - A wrong judgement leaves the stats untouched (no penalty).

use crate::types::{INITIAL_LEVEL, INITIAL_SCORE, LEVEL_PER_CORRECT, SCORE_PER_CORRECT};

/// Score and level of the current session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionStats {
    pub score: u32,
    pub level: u32,
}

impl SessionStats {
    /// Stats at session start.
    pub const fn initial() -> Self {
        Self {
            score: INITIAL_SCORE,
            level: INITIAL_LEVEL,
        }
    }
}

impl Default for SessionStats {
    fn default() -> Self {
        Self::initial()
    }
}

/// Whether the player's guess matches the round's verdict.
pub fn is_judgement_correct(round_is_correct: bool, user_guess: bool) -> bool {
    round_is_correct == user_guess
}

/// Stats after the player judges a round.
pub fn apply_verdict(
    stats: SessionStats,
    round_is_correct: bool,
    user_guess: bool,
) -> SessionStats {
    if !is_judgement_correct(round_is_correct, user_guess) {
        return stats;
    }

    SessionStats {
        score: stats.score.saturating_add(SCORE_PER_CORRECT),
        level: stats.level.saturating_add(LEVEL_PER_CORRECT),
    }
}
