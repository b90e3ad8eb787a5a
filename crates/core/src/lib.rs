//! Core quiz logic module - pure, deterministic, and testable
//!
//! This module contains the whole session engine: question generation,
//! scoring, the countdown and the session state machine.
//! It has **zero dependencies** on UI, networking, or I/O, making it:
//!
//! - **Deterministic**: Same seed produces identical question sequences
//! - **Testable**: Every rule is reachable from plain function calls
//! - **Portable**: Drives a terminal, a remote agent, or a headless test equally
//!
//! # Module Structure
//!
//! - [`rng`]: seeded LCG plus bounded integer and operator draws
//! - [`question`]: questions, proposed results and round generation
//! - [`scoring`]: score/level update for a judgement
//! - [`clock`]: countdown state and the fixed-cadence tick source
//! - [`session`]: the `NotStarted -> Running -> GameOver` state machine
//! - [`snapshot`]: copyable view of a session for renderers and observers
//!
//! # Game Rules
//!
//! - Each round shows `abc <op> def = N` with 3-digit operands and `+`, `-` or `*`
//! - Half of the rounds propose a result shifted by a delta in `[-10, 10)`;
//!   a zero delta leaves the result correct
//! - A correct judgement is worth 5 points and one level
//! - The session ends 20 seconds after it starts; answering does not add time
//!
//! # Example
//!
//! ```
//! use tui_quiz_core::{QuizSession, SessionEvent};
//! use tui_quiz_types::SessionPhase;
//!
//! let mut session = QuizSession::new(12345);
//! session.start_session().unwrap();
//!
//! // Judge the current round.
//! let truth = session.round().unwrap().verdict();
//! session.submit_verdict(truth).unwrap();
//! assert_eq!(session.stats().score, 5);
//!
//! // Run the countdown out.
//! session.advance(20_000);
//! assert_eq!(session.phase(), SessionPhase::GameOver);
//! assert!(matches!(
//!     session.take_events().last().map(|r| r.event),
//!     Some(SessionEvent::GameOver { .. })
//! ));
//! ```
//!
//! # Timing
//!
//! Call [`QuizSession::advance`](session::QuizSession::advance) with elapsed
//! wall-clock milliseconds; it fires one tick per 1000ms.

pub mod clock;
pub mod error;
pub mod question;
pub mod rng;
pub mod scoring;
pub mod session;
pub mod snapshot;

pub use tui_quiz_types as types;

// Re-export commonly used types for convenience
pub use clock::{tick, ClockState, TickSource};
pub use error::QuizError;
pub use question::{evaluate, generate_round, parse_verdict, Hypothesis, Question, Round};
pub use rng::{random_int_between, random_int_with_digit_count, random_operator, SimpleRng};
pub use scoring::{apply_verdict, SessionStats};
pub use session::{EventRecord, QuizSession, SessionEvent};
pub use snapshot::SessionSnapshot;
