//! Weighted selection under a soft per-week usage cap.
//!
//! Used to spread screening/MR slots across the week: anyone still under
//! the cap is preferred, and over-cap candidates are drawn only to cover
//! the shortfall.

use crate::{
    rng::RosterRng,
    sampler::weighted_sample,
    types::{CountMap, EmployeeCode},
};

/// Result of one capped draw.
#[derive(Debug, Clone, PartialEq)]
pub struct CappedPick {
    pub chosen: Vec<EmployeeCode>,
    /// Picks that were already at or above the cap when chosen.
    pub over_cap: Vec<EmployeeCode>,
}

/// Choose up to `k` distinct candidates, preferring those with `usage < cap`.
///
/// Never returns duplicates or more than `k`; returns fewer only when the
/// candidate pool itself is smaller than `k`.
pub fn capped_select<F>(
    candidates: &[EmployeeCode],
    weight: F,
    k: usize,
    usage: &CountMap,
    cap: u32,
    floor: f64,
    rng: &mut RosterRng,
) -> CappedPick
where
    F: Fn(&str) -> f64,
{
    if k == 0 || candidates.is_empty() {
        return CappedPick { chosen: Vec::new(), over_cap: Vec::new() };
    }

    let used = |c: &EmployeeCode| usage.get(c).copied().unwrap_or(0);
    let mut under_cap: Vec<EmployeeCode> = Vec::new();
    for c in candidates.iter().filter(|c| used(*c) < cap) {
        if !under_cap.contains(c) {
            under_cap.push(c.clone());
        }
    }

    if under_cap.len() >= k {
        let chosen = weighted_sample(&under_cap, &weight, k, floor, rng);
        return CappedPick { chosen, over_cap: Vec::new() };
    }

    let remaining = k - under_cap.len();
    let over_cap_pool: Vec<EmployeeCode> = candidates
        .iter()
        .filter(|c| !under_cap.contains(c))
        .cloned()
        .collect();
    let over_cap = weighted_sample(&over_cap_pool, &weight, remaining, floor, rng);

    let mut chosen = under_cap;
    chosen.extend(over_cap.iter().cloned());
    CappedPick { chosen, over_cap }
}
