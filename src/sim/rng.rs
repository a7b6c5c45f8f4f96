//! Seeded random source
//!
//! A 32-bit linear congruential generator. Every stochastic stage draws unit
//! floats through [`RandomSource`], so a whole game replays from its seed.

use serde::{Deserialize, Serialize};

const LCG_MULTIPLIER: u32 = 1_664_525;
const LCG_INCREMENT: u32 = 1_013_904_223;
const TWO_POW_32: f64 = 4_294_967_296.0;

/// A source of uniform floats in [0, 1)
pub trait RandomSource {
    fn next_unit(&mut self) -> f64;
}

/// Deterministic LCG: `state = state * 1664525 + 1013904223 mod 2^32`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeededRng {
    state: u32,
}

impl SeededRng {
    /// Create a generator; only the low 32 bits of the seed are used
    pub fn new(seed: u64) -> Self {
        Self { state: seed as u32 }
    }

    /// Current internal state (advances on every draw)
    pub fn state(&self) -> u32 {
        self.state
    }

    #[inline]
    fn advance(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(LCG_MULTIPLIER)
            .wrapping_add(LCG_INCREMENT);
        self.state
    }
}

impl RandomSource for SeededRng {
    #[inline]
    fn next_unit(&mut self) -> f64 {
        self.advance() as f64 / TWO_POW_32
    }
}

/// Draw a weighted index
///
/// Walks the cumulative weights subtracting from `rng * total` until the
/// threshold drops to zero or below. Falls back to the last index when
/// floating-point rounding leaves a positive remainder.
pub fn pick_index(weights: &[f64], rng: &mut dyn RandomSource) -> usize {
    let total: f64 = weights.iter().sum();
    let mut threshold = rng.next_unit() * total;
    for (i, weight) in weights.iter().enumerate() {
        threshold -= weight;
        if threshold <= 0.0 {
            return i;
        }
    }
    weights.len().saturating_sub(1)
}

/// Map a unit draw onto `0..len`
#[inline]
pub(crate) fn unit_to_index(unit: f64, len: usize) -> usize {
    ((unit * len as f64).floor() as usize).min(len.saturating_sub(1))
}
