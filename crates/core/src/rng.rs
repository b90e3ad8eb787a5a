//! RNG module - bounded integers and operator draws
//!
//! All randomness in a session flows through one seeded [`SimpleRng`], so a
//! seed fully determines the sequence of questions (useful for replays,
//! remote agents and tests).
//!
//! Range reduction uses the high bits of the generator output
//! (multiply-shift) rather than `% n`: the low bits of a power-of-two LCG
//! have short periods, and the lowest one simply alternates.

use crate::error::QuizError;
use crate::types::Operator;

/// Largest digit count whose values still fit in an `i64`.
pub const MAX_DIGITS: u32 = 18;

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate next random u64 from two draws
    pub fn next_u64(&mut self) -> u64 {
        let hi = self.next_u32() as u64;
        let lo = self.next_u32() as u64;
        (hi << 32) | lo
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }

    /// Generate random value in range [0, span)
    pub fn next_range_u64(&mut self, span: u64) -> u64 {
        ((self.next_u64() as u128 * span as u128) >> 64) as u64
    }

    /// Fair coin flip
    pub fn next_bool(&mut self) -> bool {
        self.next_u32() >> 31 == 1
    }

    /// Current internal state (seed for an identical continuation)
    pub fn state(&self) -> u32 {
        self.state
    }
}

impl Default for SimpleRng {
    fn default() -> Self {
        Self::new(1)
    }
}

/// Draw an integer with exactly `digit_count` decimal digits.
///
/// `digit_count = 3` yields a value in `[100, 999]`.
pub fn random_int_with_digit_count(
    rng: &mut SimpleRng,
    digit_count: u32,
) -> Result<i64, QuizError> {
    if digit_count == 0 {
        return Err(QuizError::invalid_argument("digit_count", "must be greater than 0"));
    }
    if digit_count > MAX_DIGITS {
        return Err(QuizError::invalid_argument("digit_count", "must be at most 18"));
    }

    let min = 10i64.pow(digit_count - 1);
    let span = 9 * min as u64;
    Ok(min + rng.next_range_u64(span) as i64)
}

/// Draw an integer in `[min, max)`.
pub fn random_int_between(rng: &mut SimpleRng, min: i64, max: i64) -> Result<i64, QuizError> {
    if min >= max {
        return Err(QuizError::invalid_argument("max", "must be greater than min"));
    }

    let span = max.abs_diff(min);
    let offset = rng.next_range_u64(span);
    Ok((min as i128 + offset as i128) as i64)
}

/// Pick one operator uniformly from `candidates`.
pub fn random_operator(
    rng: &mut SimpleRng,
    candidates: &[Operator],
) -> Result<Operator, QuizError> {
    if candidates.is_empty() {
        return Err(QuizError::invalid_argument("candidates", "must not be empty"));
    }

    let idx = rng.next_range(candidates.len() as u32) as usize;
    Ok(candidates[idx])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_deterministic() {
        let mut rng1 = SimpleRng::new(12345);
        let mut rng2 = SimpleRng::new(12345);

        // Same seed should produce same sequence
        for _ in 0..100 {
            assert_eq!(rng1.next_u32(), rng2.next_u32());
        }
    }

    #[test]
    fn test_rng_different_seeds() {
        let mut rng1 = SimpleRng::new(12345);
        let mut rng2 = SimpleRng::new(54321);

        let v1 = rng1.next_u32();
        let v2 = rng2.next_u32();
        assert_ne!(v1, v2);
    }

    #[test]
    fn test_zero_seed_is_usable() {
        let mut rng = SimpleRng::new(0);
        assert_eq!(rng.state(), 1);
        assert_ne!(rng.next_u32(), rng.next_u32());
    }

    #[test]
    fn test_next_range_bounds() {
        let mut rng = SimpleRng::new(7);
        for _ in 0..1000 {
            assert!(rng.next_range(3) < 3);
        }
        assert_eq!(rng.next_range(1), 0);
    }

    #[test]
    fn test_next_bool_is_not_alternating() {
        let mut rng = SimpleRng::new(42);
        let flips: Vec<bool> = (0..64).map(|_| rng.next_bool()).collect();
        assert!(flips.windows(2).any(|w| w[0] == w[1]));
        assert!(flips.iter().any(|&b| b));
        assert!(flips.iter().any(|&b| !b));
    }

    #[test]
    fn test_digit_count_bounds() {
        let mut rng = SimpleRng::new(2024);
        for digits in 1..=4u32 {
            let lo = 10i64.pow(digits - 1);
            let hi = 10i64.pow(digits) - 1;
            for _ in 0..500 {
                let v = random_int_with_digit_count(&mut rng, digits).unwrap();
                assert!(v >= lo && v <= hi, "{} has wrong digit count {}", v, digits);
            }
        }
    }

    #[test]
    fn test_digit_count_max() {
        let mut rng = SimpleRng::new(3);
        let v = random_int_with_digit_count(&mut rng, MAX_DIGITS).unwrap();
        assert!(v >= 10i64.pow(MAX_DIGITS - 1));
        assert!(v <= 10i64.pow(MAX_DIGITS) - 1);
    }

    #[test]
    fn test_digit_count_invalid() {
        let mut rng = SimpleRng::new(1);
        assert!(matches!(
            random_int_with_digit_count(&mut rng, 0),
            Err(QuizError::InvalidArgument { name: "digit_count", .. })
        ));
        assert!(matches!(
            random_int_with_digit_count(&mut rng, MAX_DIGITS + 1),
            Err(QuizError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_between_is_half_open() {
        let mut rng = SimpleRng::new(99);
        let mut seen_min = false;
        for _ in 0..5000 {
            let v = random_int_between(&mut rng, -10, 10).unwrap();
            assert!((-10..10).contains(&v));
            seen_min |= v == -10;
        }
        assert!(seen_min);
    }

    #[test]
    fn test_between_single_value() {
        let mut rng = SimpleRng::new(5);
        for _ in 0..10 {
            assert_eq!(random_int_between(&mut rng, 4, 5).unwrap(), 4);
        }
    }

    #[test]
    fn test_between_invalid() {
        let mut rng = SimpleRng::new(1);
        assert!(random_int_between(&mut rng, 5, 5).is_err());
        assert!(random_int_between(&mut rng, 6, 5).is_err());
    }

    #[test]
    fn test_between_full_range_does_not_overflow() {
        let mut rng = SimpleRng::new(11);
        for _ in 0..100 {
            let _ = random_int_between(&mut rng, i64::MIN, i64::MAX).unwrap();
        }
    }

    #[test]
    fn test_operator_covers_candidates() {
        let mut rng = SimpleRng::new(8);
        let mut seen = [false; 3];
        for _ in 0..300 {
            match random_operator(&mut rng, &Operator::ALL).unwrap() {
                Operator::Add => seen[0] = true,
                Operator::Sub => seen[1] = true,
                Operator::Mul => seen[2] = true,
            }
        }
        assert_eq!(seen, [true, true, true]);
    }

    #[test]
    fn test_operator_single_candidate() {
        let mut rng = SimpleRng::new(8);
        for _ in 0..20 {
            assert_eq!(random_operator(&mut rng, &[Operator::Sub]).unwrap(), Operator::Sub);
        }
    }

    #[test]
    fn test_operator_empty_candidates() {
        let mut rng = SimpleRng::new(8);
        assert!(matches!(
            random_operator(&mut rng, &[]),
            Err(QuizError::InvalidArgument { name: "candidates", .. })
        ));
    }
}
