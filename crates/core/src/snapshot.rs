use std::hash::{Hash, Hasher};

use crate::clock::ClockState;
use crate::question::Round;
use crate::scoring::SessionStats;
use crate::types::SessionPhase;

/// Everything a view needs to draw one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub stats: SessionStats,
    pub clock: ClockState,
    pub round: Option<Round>,
    pub episode_id: u32,
    pub round_id: u32,
    pub ticking: bool,
}

impl SessionSnapshot {
    /// Whether a verdict would currently be accepted.
    pub fn playable(&self) -> bool {
        self.phase.is_running() && self.round.is_some()
    }

    /// Stable 64-bit hash of the visible state.
    ///
    /// Uses FNV-1a rather than `DefaultHasher`, whose output is not guaranteed
    /// stable across Rust versions/platforms.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = Fnv1aHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self {
            phase: SessionPhase::NotStarted,
            stats: SessionStats::initial(),
            clock: ClockState::default(),
            round: None,
            episode_id: 0,
            round_id: 0,
            ticking: false,
        }
    }
}

#[derive(Debug, Clone)]
struct Fnv1aHasher {
    state: u64,
}

impl Fnv1aHasher {
    const OFFSET_BASIS: u64 = 0xcbf29ce484222325;
    const PRIME: u64 = 0x100000001b3;

    fn new() -> Self {
        Self {
            state: Self::OFFSET_BASIS,
        }
    }
}

impl Hasher for Fnv1aHasher {
    fn finish(&self) -> u64 {
        self.state
    }

    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.state ^= b as u64;
            self.state = self.state.wrapping_mul(Self::PRIME);
        }
    }
}
