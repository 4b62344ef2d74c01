//! Weighted sampler and capped selector tests.
//!
//! Tests cover: distinctness, pool bounds, degenerate weights, weight
//! proportionality, soft-cap preference and overflow.

use roster_core::{
    capped_selector::capped_select,
    rng::RosterRng,
    sampler::{rate_weight, weighted_sample},
    types::{CountMap, WorkRates},
};
use std::collections::{BTreeMap, BTreeSet};

// ── Test helpers ────────────────────────────────────────────────────────────

fn codes(list: &[&str]) -> Vec<String> {
    list.iter().map(|c| c.to_string()).collect()
}

fn rates(list: &[(&str, u32)]) -> WorkRates {
    list.iter().map(|(c, r)| (c.to_string(), *r)).collect()
}

fn usage(list: &[(&str, u32)]) -> CountMap {
    list.iter().map(|(c, n)| (c.to_string(), *n)).collect()
}

const FLOOR: f64 = 0.001;

// ── Weighted sampler ────────────────────────────────────────────────────────

/// k=3 from a 5-candidate pool gives 3 distinct members of the pool.
#[test]
fn sample_returns_distinct_members_of_pool() {
    let pool = codes(&["A", "B", "C", "D", "E"]);
    let weights = rates(&[("A", 100), ("B", 50), ("C", 20), ("D", 100), ("E", 80)]);

    for seed in 0..200 {
        let mut rng = RosterRng::new(seed, 0);
        let picks = weighted_sample(&pool, rate_weight(&weights), 3, FLOOR, &mut rng);
        assert_eq!(picks.len(), 3, "seed {seed}: expected 3 picks, got {picks:?}");
        let unique: BTreeSet<_> = picks.iter().collect();
        assert_eq!(unique.len(), 3, "seed {seed}: duplicate pick in {picks:?}");
        assert!(picks.iter().all(|p| pool.contains(p)), "seed {seed}: pick outside pool");
    }
}

#[test]
fn sample_returns_whole_pool_when_k_exceeds_it() {
    let pool = codes(&["A", "B"]);
    let mut rng = RosterRng::new(7, 0);
    let picks = weighted_sample(&pool, |_| 1.0, 5, FLOOR, &mut rng);
    let got: BTreeSet<_> = picks.into_iter().collect();
    assert_eq!(got, pool.into_iter().collect());
}

#[test]
fn sample_is_empty_for_zero_k_or_empty_pool() {
    let mut rng = RosterRng::new(1, 0);
    assert!(weighted_sample(&codes(&["A"]), |_| 1.0, 0, FLOOR, &mut rng).is_empty());
    assert!(weighted_sample(&[], |_| 1.0, 3, FLOOR, &mut rng).is_empty());
}

/// Duplicate codes in the input never yield duplicate picks.
#[test]
fn sample_ignores_duplicate_candidates() {
    let pool = codes(&["A", "A", "B"]);
    let mut rng = RosterRng::new(3, 0);
    let picks = weighted_sample(&pool, |_| 1.0, 3, FLOOR, &mut rng);
    assert_eq!(picks.len(), 2);
}

/// All-zero weights: the floor makes every candidate equally likely.
#[test]
fn zero_weights_sample_near_uniformly() {
    let pool = codes(&["A", "B", "C", "D", "E"]);
    let weights = rates(&[("A", 0), ("B", 0), ("C", 0), ("D", 0), ("E", 0)]);
    let mut rng = RosterRng::new(0xABCD, 0);
    let mut hits: BTreeMap<String, u32> = BTreeMap::new();

    for _ in 0..5000 {
        let pick = weighted_sample(&pool, rate_weight(&weights), 1, FLOOR, &mut rng);
        *hits.entry(pick[0].clone()).or_insert(0) += 1;
    }

    for code in &pool {
        let n = hits.get(code).copied().unwrap_or(0);
        assert!(
            (800..=1200).contains(&n),
            "{code} picked {n} times out of 5000; expected about 1000"
        );
    }
}

/// No floor and non-positive weights: uniform fallback, still distinct.
#[test]
fn degenerate_weights_fall_back_to_uniform() {
    let pool = codes(&["A", "B", "C"]);
    let mut seen = BTreeSet::new();
    for seed in 0..100 {
        let mut rng = RosterRng::new(seed, 0);
        let picks = weighted_sample(&pool, |_| -5.0, 2, 0.0, &mut rng);
        assert_eq!(picks.len(), 2);
        assert_ne!(picks[0], picks[1]);
        seen.insert(picks[0].clone());
    }
    assert_eq!(seen.len(), 3, "uniform fallback should reach every candidate first");
}

/// A full-time candidate dominates a zero-rate one.
#[test]
fn heavier_weight_is_drawn_more_often() {
    let pool = codes(&["A", "B"]);
    let weights = rates(&[("A", 100), ("B", 0)]);
    let mut rng = RosterRng::new(99, 0);
    let a_first = (0..1000)
        .filter(|_| weighted_sample(&pool, rate_weight(&weights), 1, FLOOR, &mut rng)[0] == "A")
        .count();
    assert!(a_first >= 990, "A drawn first only {a_first}/1000 times");
}

/// Unknown codes weigh zero, so they only win through the floor.
#[test]
fn unknown_codes_weigh_zero() {
    let weights = rates(&[("A", 100)]);
    let weight = rate_weight(&weights);
    assert_eq!(weight("A"), 100.0);
    assert_eq!(weight("ZZ"), 0.0);
}

// ── Capped selector ─────────────────────────────────────────────────────────

/// With at least k under-cap candidates, nobody at or over the cap is chosen.
#[test]
fn capped_selector_prefers_under_cap() {
    let pool = codes(&["A", "B", "C", "D", "E"]);
    let weights = rates(&[("A", 100), ("B", 100), ("C", 10), ("D", 10), ("E", 10)]);
    let used = usage(&[("A", 1), ("B", 3)]);

    for seed in 0..200 {
        let mut rng = RosterRng::new(seed, 1);
        let pick = capped_select(&pool, rate_weight(&weights), 2, &used, 1, FLOOR, &mut rng);
        assert_eq!(pick.chosen.len(), 2);
        assert!(
            pick.chosen.iter().all(|c| c != "A" && c != "B"),
            "seed {seed}: over-cap candidate chosen: {:?}",
            pick.chosen
        );
        assert!(pick.over_cap.is_empty());
    }
}

/// Too few under-cap: take them all, then fill from over-cap.
#[test]
fn capped_selector_overflows_only_for_shortfall() {
    let pool = codes(&["A", "B", "C", "D"]);
    let weights = rates(&[("A", 100), ("B", 100), ("C", 100), ("D", 100)]);
    let used = usage(&[("A", 1), ("B", 1), ("C", 2)]);

    let mut rng = RosterRng::new(5, 1);
    let pick = capped_select(&pool, rate_weight(&weights), 2, &used, 1, FLOOR, &mut rng);

    assert_eq!(pick.chosen.len(), 2);
    assert_eq!(pick.chosen[0], "D", "the only under-cap candidate comes first");
    assert_eq!(pick.over_cap.len(), 1);
    assert_ne!(pick.over_cap[0], "D");
    assert!(pick.chosen.contains(&pick.over_cap[0]));
}

#[test]
fn capped_selector_bounds() {
    let pool = codes(&["A", "B", "C"]);
    let used = CountMap::new();
    let mut rng = RosterRng::new(11, 1);

    let pick = capped_select(&pool, |_| 1.0, 5, &used, 1, FLOOR, &mut rng);
    assert_eq!(pick.chosen.len(), 3, "returns the whole pool when it is smaller than k");
    let unique: BTreeSet<_> = pick.chosen.iter().collect();
    assert_eq!(unique.len(), 3);

    assert!(capped_select(&pool, |_| 1.0, 0, &used, 1, FLOOR, &mut rng).chosen.is_empty());
    assert!(capped_select(&[], |_| 1.0, 2, &used, 1, FLOOR, &mut rng).chosen.is_empty());
}
