//! Deterministic random number generation.
//!
//! RULE: Nothing in the engine may call any platform RNG.
//! All randomness (station shuffles, weighted draws, lunch-guard picks)
//! flows through a RosterRng handed in by the caller.
//!
//! A run's stream is seeded from (master_seed XOR ISO year and week), so:
//!   - The same seed and week always reproduce the same schedule.
//!   - Different weeks generated with one seed get unrelated streams.

use rand::seq::SliceRandom;
use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;

use crate::calendar::IsoWeek;

/// A deterministic RNG for one generation run.
pub struct RosterRng {
    inner: Pcg64Mcg,
}

impl RosterRng {
    /// Create a generator from a master seed and a stable stream index.
    pub fn new(master_seed: u64, stream: u64) -> Self {
        let derived_seed = master_seed ^ (stream.wrapping_mul(0x9e37_79b9_7f4a_7c15));
        Self {
            inner: Pcg64Mcg::seed_from_u64(derived_seed),
        }
    }

    /// The stream used to generate a given week.
    pub fn for_week(master_seed: u64, week: IsoWeek) -> Self {
        let stream = (week.year as i64 as u64).wrapping_mul(100).wrapping_add(week.week as u64);
        Self::new(master_seed, stream)
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Roll a usize in [0, n).
    pub fn next_index(&mut self, n: usize) -> usize {
        assert!(n > 0, "n must be > 0");
        (self.inner.next_u64() % n as u64) as usize
    }

    /// Shuffle a slice in place (uniform permutation).
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.inner);
    }

    /// Uniformly pick one element, or None for an empty slice.
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let idx = self.next_index(items.len());
        items.get(idx)
    }
}
