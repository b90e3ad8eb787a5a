//! Session state machine - ties together questions, scoring and the clock
//!
//! ```text
//! NotStarted --start_session--> Running --clock expiry--> GameOver
//!                                  ^                          |
//!                                  +--------- replay ---------+
//! ```
//!
//! The session exclusively owns its stats, clock, current round and tick
//! source. Starting (or replaying) replaces the first three together and
//! restarts the tick source, so two countdowns can never advance one session.
//!
//! Every state change produces a [`SessionEvent`]. Operations return the
//! event they produced and also queue it as an [`EventRecord`] stamped with
//! the episode and round ids current at that moment; a presentation layer
//! drains the queue with [`QuizSession::take_events`].

use crate::clock::{tick, ClockState, TickSource};
use crate::error::QuizError;
use crate::question::{generate_round, Round};
use crate::rng::SimpleRng;
use crate::scoring::{apply_verdict, is_judgement_correct, SessionStats};
use crate::snapshot::SessionSnapshot;
use crate::types::{SessionPhase, SESSION_DURATION_SECS, TICK_MS};

/// Outbound notification for the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    SessionStarted {
        stats: SessionStats,
        round: Round,
        clock: ClockState,
    },
    RoundAdvanced {
        stats: SessionStats,
        round: Round,
        judged_correctly: bool,
    },
    Progress {
        elapsed_secs: u32,
        duration_secs: u32,
    },
    GameOver {
        stats: SessionStats,
    },
}

impl SessionEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            SessionEvent::SessionStarted { .. } => "session_started",
            SessionEvent::RoundAdvanced { .. } => "round_advanced",
            SessionEvent::Progress { .. } => "progress",
            SessionEvent::GameOver { .. } => "game_over",
        }
    }
}

/// A queued event together with the ids that were current once it was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventRecord {
    pub episode_id: u32,
    pub round_id: u32,
    pub event: SessionEvent,
}

/// A timed true/false arithmetic quiz.
#[derive(Debug, Clone)]
pub struct QuizSession {
    rng: SimpleRng,
    phase: SessionPhase,
    stats: SessionStats,
    clock: ClockState,
    round: Option<Round>,
    ticker: TickSource,
    /// Monotonic episode id (increments on every start after the first).
    episode_id: u32,
    /// Monotonic id of the current round (increments on every generated round).
    round_id: u32,
    events: Vec<EventRecord>,
}

impl QuizSession {
    /// Create an idle session whose questions are drawn from `seed`.
    pub fn new(seed: u32) -> Self {
        Self {
            rng: SimpleRng::new(seed),
            phase: SessionPhase::NotStarted,
            stats: SessionStats::initial(),
            clock: ClockState::new(SESSION_DURATION_SECS),
            round: None,
            ticker: TickSource::new(TICK_MS),
            episode_id: 0,
            round_id: 0,
            events: Vec::new(),
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn clock(&self) -> ClockState {
        self.clock
    }

    pub fn round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    pub fn round_id(&self) -> u32 {
        self.round_id
    }

    pub fn ticker(&self) -> &TickSource {
        &self.ticker
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase,
            stats: self.stats,
            clock: self.clock,
            round: self.round,
            episode_id: self.episode_id,
            round_id: self.round_id,
            ticking: self.ticker.is_running(),
        }
    }

    /// Begin a new session: fresh stats, fresh clock, first round, running countdown.
    pub fn start_session(&mut self) -> Result<SessionEvent, QuizError> {
        // Generate before touching any state so a failure leaves the session intact.
        let round = generate_round(&mut self.rng)?;

        self.ticker.stop();

        if self.phase != SessionPhase::NotStarted {
            self.episode_id = self.episode_id.wrapping_add(1);
        }
        self.stats = SessionStats::initial();
        self.clock = ClockState::new(SESSION_DURATION_SECS);
        self.round = Some(round);
        self.round_id = self.round_id.wrapping_add(1);
        self.phase = SessionPhase::Running;

        self.ticker.start();

        Ok(self.emit(SessionEvent::SessionStarted {
            stats: self.stats,
            round,
            clock: self.clock,
        }))
    }

    /// Equivalent to [`start_session`](Self::start_session); valid from any phase.
    pub fn replay(&mut self) -> Result<SessionEvent, QuizError> {
        self.start_session()
    }

    /// Judge the current round and move on to the next one. Leaves the clock alone.
    pub fn submit_verdict(&mut self, user_guess: bool) -> Result<SessionEvent, QuizError> {
        if !self.phase.is_running() {
            return Err(QuizError::InvalidState { phase: self.phase });
        }
        let Some(current) = self.round else {
            return Err(QuizError::InvalidState { phase: self.phase });
        };

        let judged_correctly = is_judgement_correct(current.verdict(), user_guess);
        let stats = apply_verdict(self.stats, current.verdict(), user_guess);
        let next = generate_round(&mut self.rng)?;

        self.stats = stats;
        self.round = Some(next);
        self.round_id = self.round_id.wrapping_add(1);

        Ok(self.emit(SessionEvent::RoundAdvanced {
            stats,
            round: next,
            judged_correctly,
        }))
    }

    /// One countdown step. Returns `None` when no countdown is running.
    pub fn on_tick(&mut self) -> Option<SessionEvent> {
        if !self.phase.is_running() || !self.ticker.is_running() {
            return None;
        }

        self.clock = tick(self.clock);

        let event = if self.clock.is_expired() {
            self.ticker.stop();
            self.phase = SessionPhase::GameOver;
            SessionEvent::GameOver { stats: self.stats }
        } else {
            SessionEvent::Progress {
                elapsed_secs: self.clock.elapsed_secs(),
                duration_secs: self.clock.duration_secs(),
            }
        };

        Some(self.emit(event))
    }

    /// Feed elapsed wall-clock time; fires `on_tick` once per due tick.
    ///
    /// Returns the number of ticks that took effect.
    pub fn advance(&mut self, elapsed_ms: u32) -> u32 {
        let due = self.ticker.advance(elapsed_ms);
        let mut fired = 0;
        for _ in 0..due {
            if self.on_tick().is_none() {
                break;
            }
            fired += 1;
        }
        fired
    }

    /// Drain queued events in emission order.
    pub fn take_events(&mut self) -> Vec<EventRecord> {
        std::mem::take(&mut self.events)
    }

    fn emit(&mut self, event: SessionEvent) -> SessionEvent {
        self.events.push(EventRecord {
            episode_id: self.episode_id,
            round_id: self.round_id,
            event,
        });
        event
    }

    #[cfg(test)]
    pub(crate) fn set_round(&mut self, round: Round) {
        self.round = Some(round);
    }
}

impl Default for QuizSession {
    fn default() -> Self {
        Self::new(1)
    }
}
