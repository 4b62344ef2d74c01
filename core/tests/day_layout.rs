//! Single-day layout tests.
//!
//! Tests cover: injective labs, duty exclusion, Friday, lunch guard,
//! lab priority, afternoon rotation, empty pools, zero-rate screening.

use roster_core::{
    assignment::{LabLayout, RunningCounters},
    availability::Availability,
    calendar::Weekday,
    config::RosterConfig,
    day_planner::{plan_day, repeated_stations, DayInput, DayPlan},
    event::{Phase, RosterEvent},
    rng::RosterRng,
    types::{CountMap, EmployeeCode, WorkRates},
};
use std::collections::BTreeSet;

// ── Test helpers ────────────────────────────────────────────────────────────

fn full_rates(config: &RosterConfig) -> WorkRates {
    config.employees.iter().map(|c| (c.clone(), 100)).collect()
}

fn plan(
    config: &RosterConfig,
    availability: &Availability,
    rates: &WorkRates,
    day: Weekday,
    duty_holder: Option<&EmployeeCode>,
    counters: RunningCounters,
    seed: u64,
) -> DayPlan {
    let input = DayInput { day, config, availability, rates, duty_holder };
    plan_day(&input, counters, &mut RosterRng::new(seed, 0))
}

fn simple(roster: &[&str], day: Weekday, seed: u64) -> DayPlan {
    let config = RosterConfig::with_roster(roster);
    let availability = Availability::new(&config.employees);
    let rates = full_rates(&config);
    plan(&config, &availability, &rates, day, None, RunningCounters::default(), seed)
}

fn assert_injective(layout: &LabLayout) {
    let stations: BTreeSet<_> = layout.values().collect();
    assert_eq!(stations.len(), layout.len(), "station used twice: {layout:?}");
}

fn has_event(plan: &DayPlan, pred: impl Fn(&RosterEvent) -> bool) -> bool {
    plan.events.iter().any(pred)
}

// ── Layout shape ────────────────────────────────────────────────────────────

/// Nobody holds two slots in one block, no station is shared.
#[test]
fn blocks_are_injective() {
    for seed in 0..50 {
        let p = simple(&["A", "B", "C", "D", "E", "F", "G"], Weekday::Tuesday, seed);
        let a = &p.assignment;
        assert_injective(&a.morning_lab);
        assert_injective(a.afternoon_lab.as_ref().unwrap());

        let morning = a.morning_people();
        let unique: BTreeSet<_> = morning.iter().collect();
        assert_eq!(unique.len(), morning.len(), "seed {seed}: double-booked morning");

        let afternoon = a.afternoon_people();
        let unique: BTreeSet<_> = afternoon.iter().collect();
        assert_eq!(unique.len(), afternoon.len(), "seed {seed}: double-booked afternoon");

        assert_eq!(a.morning_lab.len(), 4);
        assert_eq!(a.morning_screen.len(), 1);
    }
}

#[test]
fn friday_has_no_afternoon() {
    let p = simple(&["A", "B", "C", "D", "E"], Weekday::Friday, 3);
    assert!(p.assignment.afternoon_lab.is_none());
    assert!(p.assignment.afternoon_screen.is_none());
    assert_eq!(p.assignment.morning_lab.len(), 4);
}

/// Lab stations are filled before screening.
#[test]
fn labs_fill_before_screening() {
    let p = simple(&["A", "B", "C"], Weekday::Monday, 1);
    assert_eq!(p.assignment.morning_lab.len(), 3);
    assert!(p.assignment.morning_screen.is_empty());
    assert!(has_event(&p, |e| matches!(
        e,
        RosterEvent::EmptyPool { phase: Phase::MorningScreening, .. }
    )));
}

// ── Duty exclusion ──────────────────────────────────────────────────────────

#[test]
fn full_day_holder_has_no_slots() {
    let config = RosterConfig::with_roster(&["A", "B", "C", "D", "E"]);
    let availability = Availability::new(&config.employees);
    let rates = full_rates(&config);
    let holder = "B".to_string();

    for seed in 0..30 {
        let p = plan(&config, &availability, &rates, Weekday::Tuesday, Some(&holder), RunningCounters::default(), seed);
        assert!(!p.assignment.slot_holders().contains(&&holder), "seed {seed}: B worked on a full duty day");
        assert_eq!(p.assignment.duty.as_ref(), Some(&holder));
        assert!(p.assignment.lunch_guard.is_none());
    }
}

/// Half-day duty covers the morning only; the holder is back for the afternoon.
#[test]
fn half_day_holder_returns_for_afternoon() {
    let config = RosterConfig::with_roster(&["A", "B", "C", "D", "E"]);
    let availability = Availability::new(&config.employees);
    let rates = full_rates(&config);
    let holder = "A".to_string();

    let p = plan(&config, &availability, &rates, Weekday::Monday, Some(&holder), RunningCounters::default(), 9);
    assert!(!p.assignment.morning_people().contains(&&holder));
    assert!(
        p.assignment.afternoon_people().contains(&&holder),
        "A should be back in the afternoon: {:?}",
        p.assignment
    );
    // B..E fill the four morning stations, A takes an afternoon station.
    assert!(p.assignment.afternoon_lab.as_ref().unwrap().contains_key("A"));
}

// ── Lunch guard ─────────────────────────────────────────────────────────────

#[test]
fn lunch_guard_is_drawn_outside_the_morning_lab() {
    for seed in 0..50 {
        let p = simple(&["A", "B", "C", "D", "E", "F"], Weekday::Wednesday, seed);
        let guard = p.assignment.lunch_guard.clone().expect("lunch guard on Wednesday");
        assert!(
            !p.assignment.morning_lab.contains_key(&guard),
            "seed {seed}: lunch guard {guard} also in morning lab"
        );
        assert!(has_event(&p, |e| matches!(e, RosterEvent::LunchGuardAssigned { .. })));
    }
}

#[test]
fn lunch_guard_falls_back_to_anyone_available() {
    let p = simple(&["A", "B", "C"], Weekday::Wednesday, 4);
    let guard = p.assignment.lunch_guard.expect("fallback lunch guard");
    assert!(["A", "B", "C"].contains(&guard.as_str()));
}

#[test]
fn no_lunch_guard_on_other_days() {
    let p = simple(&["A", "B", "C", "D", "E", "F"], Weekday::Tuesday, 4);
    assert!(p.assignment.lunch_guard.is_none());
}

// ── Empty pools ─────────────────────────────────────────────────────────────

#[test]
fn empty_day_leaves_slots_empty_and_warns() {
    let config = RosterConfig::with_roster(&["A", "B"]);
    let mut availability = Availability::new(&config.employees);
    availability.mark_day_unavailable(Weekday::Wednesday, "A").unwrap();
    availability.mark_day_unavailable(Weekday::Wednesday, "B").unwrap();
    let rates = full_rates(&config);

    let p = plan(&config, &availability, &rates, Weekday::Wednesday, None, RunningCounters::default(), 2);

    assert!(p.assignment.slot_holders().is_empty());
    for phase in [
        Phase::MorningLab,
        Phase::MorningScreening,
        Phase::AfternoonLab,
        Phase::AfternoonScreening,
        Phase::LunchGuard,
    ] {
        assert!(
            has_event(&p, |e| matches!(e, RosterEvent::EmptyPool { phase: got, .. } if *got == phase)),
            "missing EmptyPool for {phase:?}"
        );
    }
}

// ── Lab priority and rotation ───────────────────────────────────────────────

/// The most-screened people get lab stations first; ties keep roster order.
#[test]
fn most_screened_go_to_lab_first() {
    let config = RosterConfig::with_roster(&["A", "B", "C", "D", "E", "F"]);
    let availability = Availability::new(&config.employees);
    let rates = full_rates(&config);
    let counters = RunningCounters::seeded([("F".to_string(), 3)].into());

    let p = plan(&config, &availability, &rates, Weekday::Tuesday, None, counters, 5);
    let labbed: BTreeSet<_> = p.assignment.morning_lab.keys().map(String::as_str).collect();
    assert_eq!(labbed, BTreeSet::from(["A", "B", "C", "F"]));
}

#[test]
fn morning_screener_moves_to_afternoon_lab() {
    for seed in 0..30 {
        let p = simple(&["A", "B", "C", "D", "E", "F"], Weekday::Tuesday, seed);
        let screener = &p.assignment.morning_screen[0];
        assert!(
            p.assignment.afternoon_lab.as_ref().unwrap().contains_key(screener),
            "seed {seed}: morning screener {screener} not in afternoon lab"
        );
    }
}

/// Either nobody keeps their morning station, or the fallback is reported
/// with exactly the people who kept theirs.
#[test]
fn afternoon_stations_rotate_or_report_fallback() {
    let mut fallbacks = 0;
    for seed in 0..200 {
        let p = simple(&["A", "B", "C", "D", "E", "F"], Weekday::Wednesday, seed);
        let afternoon = p.assignment.afternoon_lab.as_ref().unwrap();
        let repeated = repeated_stations(afternoon, &p.assignment.morning_lab);

        let fallback = p.events.iter().find_map(|e| match e {
            RosterEvent::DerangementFallback { repeated, .. } => Some(repeated.clone()),
            _ => None,
        });
        match fallback {
            Some(reported) => {
                fallbacks += 1;
                assert_eq!(reported, repeated, "seed {seed}");
            }
            None => assert!(repeated.is_empty(), "seed {seed}: silent repeat {repeated:?}"),
        }
    }
    assert!(fallbacks < 40, "derangement fell back {fallbacks}/200 times");
}

/// One station and one person can never rotate.
#[test]
fn single_station_always_falls_back() {
    let config = RosterConfig {
        lab_stations: vec!["LAB 3".into()],
        ..RosterConfig::with_roster(&["A"])
    };
    let availability = Availability::new(&config.employees);
    let rates = full_rates(&config);

    let p = plan(&config, &availability, &rates, Weekday::Monday, None, RunningCounters::default(), 1);
    assert!(has_event(&p, |e| matches!(
        e,
        RosterEvent::DerangementFallback { attempts: 10, repeated, .. } if repeated == &vec!["A".to_string()]
    )));
}

// ── Screening ───────────────────────────────────────────────────────────────

#[test]
fn zero_rate_employee_never_screens() {
    let config = RosterConfig::with_roster(&["A", "B", "C", "D", "E", "F"]);
    let availability = Availability::new(&config.employees);
    let mut rates = full_rates(&config);
    rates.insert("E".into(), 0);

    for seed in 0..50 {
        let p = plan(&config, &availability, &rates, Weekday::Tuesday, None, RunningCounters::default(), seed);
        let a = &p.assignment;
        assert!(!a.morning_screen.contains(&"E".to_string()), "seed {seed}");
        assert!(!a.afternoon_screen.as_ref().unwrap().contains(&"E".to_string()), "seed {seed}");
    }
}

#[test]
fn screenings_are_counted() {
    let p = simple(&["A", "B", "C", "D", "E", "F"], Weekday::Tuesday, 8);
    let total: u32 = p.counters.screen_week_count.values().sum();
    assert_eq!(total, 2, "one morning and one afternoon screener");
    assert_eq!(p.counters.screen_count, p.counters.screen_week_count);
    assert_eq!(p.counters.assigned_this_week, CountMap::new());
}
