//! Session clock - countdown state and its tick source
//!
//! [`ClockState`] is the pure countdown value (advanced by [`tick`]).
//! [`TickSource`] turns wall-clock milliseconds into whole ticks at a fixed
//! cadence and can be stopped at any time; the session owns exactly one.

use crate::types::{SESSION_DURATION_SECS, TICK_MS};

/// Countdown progress of one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClockState {
    elapsed_secs: u32,
    duration_secs: u32,
    is_expired: bool,
}

impl ClockState {
    /// A fresh clock for `duration_secs` seconds.
    pub fn new(duration_secs: u32) -> Self {
        Self {
            elapsed_secs: 0,
            duration_secs,
            is_expired: duration_secs == 0,
        }
    }

    pub fn elapsed_secs(&self) -> u32 {
        self.elapsed_secs
    }

    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }

    pub fn remaining_secs(&self) -> u32 {
        self.duration_secs - self.elapsed_secs
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired
    }

    /// Width of the remaining-time bar, 100 at start and 0 on expiry.
    pub fn remaining_percent(&self) -> u32 {
        if self.duration_secs == 0 {
            return 0;
        }
        self.remaining_secs() * 100 / self.duration_secs
    }
}

impl Default for ClockState {
    fn default() -> Self {
        Self::new(SESSION_DURATION_SECS)
    }
}

/// Advance the countdown by one second.
///
/// The tick that reaches `duration_secs` expires the clock. An expired
/// clock is returned unchanged.
pub fn tick(clock: ClockState) -> ClockState {
    if clock.is_expired {
        return clock;
    }

    let elapsed_secs = clock.elapsed_secs + 1;
    ClockState {
        elapsed_secs,
        duration_secs: clock.duration_secs,
        is_expired: elapsed_secs >= clock.duration_secs,
    }
}

/// Fixed-cadence tick generator fed with elapsed wall-clock time.
#[derive(Debug, Clone)]
pub struct TickSource {
    interval_ms: u32,
    accumulated_ms: u32,
    running: bool,
}

impl TickSource {
    /// A stopped tick source firing every `interval_ms` once started.
    pub fn new(interval_ms: u32) -> Self {
        Self {
            interval_ms: interval_ms.max(1),
            accumulated_ms: 0,
            running: false,
        }
    }

    /// Start from a clean phase. Restarting a running source resets its phase.
    pub fn start(&mut self) {
        self.accumulated_ms = 0;
        self.running = true;
    }

    /// Stop firing. Idempotent.
    pub fn stop(&mut self) {
        self.accumulated_ms = 0;
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    /// Milliseconds until the next tick fires, if running.
    pub fn until_next_ms(&self) -> Option<u32> {
        self.running.then(|| self.interval_ms - self.accumulated_ms)
    }

    /// Feed elapsed time and return how many ticks are due.
    pub fn advance(&mut self, elapsed_ms: u32) -> u32 {
        if !self.running {
            return 0;
        }

        let total = self.accumulated_ms as u64 + elapsed_ms as u64;
        let interval = self.interval_ms as u64;
        self.accumulated_ms = (total % interval) as u32;
        (total / interval) as u32
    }
}

impl Default for TickSource {
    fn default() -> Self {
        Self::new(TICK_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_clock() {
        let clock = ClockState::default();
        assert_eq!(clock.elapsed_secs(), 0);
        assert_eq!(clock.duration_secs(), 20);
        assert!(!clock.is_expired());
        assert_eq!(clock.remaining_percent(), 100);
    }

    #[test]
    fn test_first_tick() {
        let clock = tick(ClockState::default());
        assert_eq!(clock.elapsed_secs(), 1);
        assert!(!clock.is_expired());
        assert_eq!(clock.remaining_secs(), 19);
    }

    #[test]
    fn test_expires_after_exactly_duration_ticks() {
        let mut clock = ClockState::new(20);
        for i in 1..20 {
            clock = tick(clock);
            assert_eq!(clock.elapsed_secs(), i);
            assert!(!clock.is_expired(), "expired early at tick {}", i);
        }
        clock = tick(clock);
        assert_eq!(clock.elapsed_secs(), 20);
        assert!(clock.is_expired());
        assert_eq!(clock.remaining_percent(), 0);
    }

    #[test]
    fn test_expired_clock_is_stable() {
        let mut clock = ClockState::new(2);
        clock = tick(tick(clock));
        assert!(clock.is_expired());
        let again = tick(clock);
        assert_eq!(again, clock);
        assert!(again.elapsed_secs() <= again.duration_secs());
    }

    #[test]
    fn test_zero_duration_is_expired() {
        let clock = ClockState::new(0);
        assert!(clock.is_expired());
        assert_eq!(clock.remaining_percent(), 0);
        assert_eq!(tick(clock), clock);
    }

    #[test]
    fn test_remaining_percent() {
        let mut clock = ClockState::new(20);
        for _ in 0..5 {
            clock = tick(clock);
        }
        assert_eq!(clock.remaining_percent(), 75);
    }

    #[test]
    fn test_tick_source_stopped_by_default() {
        let mut src = TickSource::default();
        assert!(!src.is_running());
        assert_eq!(src.advance(5000), 0);
        assert_eq!(src.until_next_ms(), None);
    }

    #[test]
    fn test_tick_source_accumulates() {
        let mut src = TickSource::new(1000);
        src.start();
        assert_eq!(src.advance(400), 0);
        assert_eq!(src.until_next_ms(), Some(600));
        assert_eq!(src.advance(700), 1);
        assert_eq!(src.advance(2900), 3);
        assert_eq!(src.until_next_ms(), Some(1000));
    }

    #[test]
    fn test_tick_source_stop_is_idempotent() {
        let mut src = TickSource::new(1000);
        src.start();
        src.advance(900);
        src.stop();
        src.stop();
        assert!(!src.is_running());
        assert_eq!(src.advance(1000), 0);

        // Restart begins a clean phase.
        src.start();
        assert_eq!(src.advance(999), 0);
        assert_eq!(src.advance(1), 1);
    }

    #[test]
    fn test_tick_source_zero_interval_is_clamped() {
        let src = TickSource::new(0);
        assert_eq!(src.interval_ms(), 1);
    }
}
