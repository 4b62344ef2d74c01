//! Weighted sampling without replacement.
//!
//! Each draw picks a remaining candidate with probability proportional to
//! max(floor, weight). The winner is removed and the remaining weights are
//! renormalised before the next draw. When the remaining weight is not
//! positive (or not finite) the draw falls back to a uniform pick.

use crate::{
    rng::RosterRng,
    types::{EmployeeCode, WorkRates},
};

/// Draw up to `k` distinct codes from `candidates`.
///
/// Returns fewer than `k` when the pool is smaller, and an empty list when
/// `k == 0` or the pool is empty.
pub fn weighted_sample<F>(
    candidates: &[EmployeeCode],
    weight: F,
    k: usize,
    floor: f64,
    rng: &mut RosterRng,
) -> Vec<EmployeeCode>
where
    F: Fn(&str) -> f64,
{
    let mut pool: Vec<&EmployeeCode> = Vec::with_capacity(candidates.len());
    for code in candidates {
        if !pool.contains(&code) {
            pool.push(code);
        }
    }

    let mut picks = Vec::with_capacity(k.min(pool.len()));
    while !pool.is_empty() && picks.len() < k {
        let weights: Vec<f64> = pool.iter().map(|c| floor.max(weight(c.as_str()))).collect();
        let total: f64 = weights.iter().sum();

        let idx = if total > 0.0 && total.is_finite() {
            let roll = rng.next_f64() * total;
            let mut cumulative = 0.0;
            weights
                .iter()
                .position(|w| {
                    cumulative += w;
                    roll < cumulative
                })
                // Float rounding can leave roll just past the last bucket.
                .unwrap_or(pool.len() - 1)
        } else {
            rng.next_index(pool.len())
        };

        picks.push(pool.remove(idx).clone());
    }
    picks
}

/// Weight lookup over work rates. Unknown codes weigh 0.
pub fn rate_weight(rates: &WorkRates) -> impl Fn(&str) -> f64 + '_ {
    move |code| rates.get(code).copied().unwrap_or(0) as f64
}
