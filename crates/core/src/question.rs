//! Question generation - expression, true result and proposed result
//!
//! A [`Round`] pairs an immutable [`Question`] with a [`Hypothesis`] (the
//! result shown to the player). The hypothesis' correctness is derived from
//! its displayed value when it is built and never recomputed elsewhere.

use std::fmt;

use crate::error::QuizError;
use crate::rng::{random_int_between, random_int_with_digit_count, random_operator, SimpleRng};
use crate::types::{Operator, DELTA_MAX, DELTA_MIN, OPERAND_DIGITS};

/// Apply `op` to two operands.
pub fn evaluate(op: Operator, left: i64, right: i64) -> i64 {
    match op {
        Operator::Add => left + right,
        Operator::Sub => left - right,
        Operator::Mul => left * right,
    }
}

/// An arithmetic expression and its true result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Question {
    left: i64,
    op: Operator,
    right: i64,
    true_result: i64,
}

impl Question {
    pub fn new(left: i64, op: Operator, right: i64) -> Self {
        Self {
            left,
            op,
            right,
            true_result: evaluate(op, left, right),
        }
    }

    pub fn left(&self) -> i64 {
        self.left
    }

    pub fn op(&self) -> Operator {
        self.op
    }

    pub fn right(&self) -> i64 {
        self.right
    }

    pub fn true_result(&self) -> i64 {
        self.true_result
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.left, self.op.symbol(), self.right)
    }
}

/// The result shown to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hypothesis {
    displayed_value: i64,
    is_correct: bool,
}

impl Hypothesis {
    /// Show the true result.
    pub fn truthful(true_result: i64) -> Self {
        Self {
            displayed_value: true_result,
            is_correct: true,
        }
    }

    /// Show `true_result + delta`. A zero delta yields a truthful hypothesis.
    pub fn perturbed(true_result: i64, delta: i64) -> Self {
        let displayed_value = true_result + delta;
        Self {
            displayed_value,
            is_correct: displayed_value == true_result,
        }
    }

    pub fn displayed_value(&self) -> i64 {
        self.displayed_value
    }

    pub fn is_correct(&self) -> bool {
        self.is_correct
    }
}

/// One question the player must judge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Round {
    question: Question,
    hypothesis: Hypothesis,
}

impl Round {
    pub fn new(question: Question, hypothesis: Hypothesis) -> Self {
        Self {
            question,
            hypothesis,
        }
    }

    pub fn question(&self) -> &Question {
        &self.question
    }

    pub fn hypothesis(&self) -> &Hypothesis {
        &self.hypothesis
    }

    /// Whether the proposed result is correct (the answer the player must give).
    pub fn verdict(&self) -> bool {
        self.hypothesis.is_correct
    }
}

/// Build the next round.
pub fn generate_round(rng: &mut SimpleRng) -> Result<Round, QuizError> {
    let left = random_int_with_digit_count(rng, OPERAND_DIGITS)?;
    let right = random_int_with_digit_count(rng, OPERAND_DIGITS)?;
    let op = random_operator(rng, &Operator::ALL)?;
    let question = Question::new(left, op, right);

    let hypothesis = if rng.next_bool() {
        // A zero draw falls back to the truthful result instead of resampling.
        let delta = random_int_between(rng, DELTA_MIN, DELTA_MAX)?;
        Hypothesis::perturbed(question.true_result(), delta)
    } else {
        Hypothesis::truthful(question.true_result())
    };

    Ok(Round::new(question, hypothesis))
}

/// Parse a raw verdict value.
pub fn parse_verdict(value: &str) -> Result<bool, QuizError> {
    let v = value.trim();
    if v.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if v.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(QuizError::UnrecognizedInput(value.to_string()))
    }
}
