//! Error kinds surfaced by the session engine.

use thiserror::Error;

use crate::types::SessionPhase;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuizError {
    /// A generator was asked for something it cannot produce.
    #[error("invalid argument `{name}`: {reason}")]
    InvalidArgument {
        name: &'static str,
        reason: &'static str,
    },
    /// A verdict arrived while no session was running.
    #[error("operation not allowed while session is {}", .phase.as_str())]
    InvalidState { phase: SessionPhase },
    /// A verdict value that is neither true nor false.
    #[error("unrecognized verdict input: {0:?}")]
    UnrecognizedInput(String),
}

impl QuizError {
    pub(crate) fn invalid_argument(name: &'static str, reason: &'static str) -> Self {
        Self::InvalidArgument { name, reason }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let e = QuizError::invalid_argument("digit_count", "must be in 1..=18");
        assert_eq!(
            e.to_string(),
            "invalid argument `digit_count`: must be in 1..=18"
        );

        let e = QuizError::InvalidState {
            phase: SessionPhase::GameOver,
        };
        assert_eq!(e.to_string(), "operation not allowed while session is game_over");

        let e = QuizError::UnrecognizedInput("maybe".to_string());
        assert_eq!(e.to_string(), "unrecognized verdict input: \"maybe\"");
    }
}
