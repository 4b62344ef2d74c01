//! Per-day layout: labs, screening/MR and the lunch guard.
//!
//! PHASES (sequential, no backtracking):
//!   1. Availability: week-available minus today's absentees
//!   2. Duty exclusion: full-day holder out all day, half-day holder out mornings
//!   3. Morning labs: most-screened first, shuffled stations
//!   4. Morning screen: capped weighted draw from who is left
//!   5. Afternoon: morning screeners first into labs, stations deranged
//!      against the morning, then screening (skipped on the last day)
//!   6. Duty / lunch: record the duty holder, or draw a lunch guard
//!
//! An empty pool at any phase yields an empty slot and an EmptyPool event.

use crate::{
    assignment::{Block, DayAssignment, LabLayout, RunningCounters},
    availability::Availability,
    calendar::Weekday,
    capped_selector::capped_select,
    config::{DutyKind, RosterConfig},
    event::{Phase, RosterEvent},
    rng::RosterRng,
    sampler::rate_weight,
    types::{EmployeeCode, WorkRates},
};

/// Everything a single day needs that does not change during the week.
pub struct DayInput<'a> {
    pub day:          Weekday,
    pub config:       &'a RosterConfig,
    pub availability: &'a Availability,
    pub rates:        &'a WorkRates,
    pub duty_holder:  Option<&'a EmployeeCode>,
}

/// A planned day plus the counters to hand to the next day.
pub struct DayPlan {
    pub assignment: DayAssignment,
    pub counters:   RunningCounters,
    pub events:     Vec<RosterEvent>,
}

pub fn plan_day(input: &DayInput<'_>, mut counters: RunningCounters, rng: &mut RosterRng) -> DayPlan {
    let DayInput { day, config, rates, duty_holder, .. } = *input;
    let mut events = Vec::new();
    let mut assignment = DayAssignment::default();

    // 1. Availability
    let available = input.availability.available_on(day);

    // 2. Duty exclusion
    let kind = duty_holder.and(config.duty_kind(day));
    let out_all_day = |c: &EmployeeCode| kind == Some(DutyKind::FullDay) && Some(c) == duty_holder;
    let out_morning = |c: &EmployeeCode| kind.is_some() && Some(c) == duty_holder;

    let morning_pool: Vec<EmployeeCode> =
        available.iter().filter(|c| !out_morning(*c)).cloned().collect();
    let afternoon_pool: Vec<EmployeeCode> =
        available.iter().filter(|c| !out_all_day(*c)).cloned().collect();
    let has_rate = |c: &EmployeeCode| rates.get(c).copied().unwrap_or(0) > 0;

    // 3. Morning labs
    let mut ranked = morning_pool.clone();
    // Stable: equal counts keep roster order.
    ranked.sort_by(|a, b| counters.screens_of(b).cmp(&counters.screens_of(a)));
    ranked.truncate(config.lab_stations.len());
    if ranked.is_empty() {
        warn_empty(&mut events, day, Phase::MorningLab);
    }
    let mut stations = config.lab_stations.clone();
    rng.shuffle(&mut stations);
    assignment.morning_lab = ranked.iter().cloned().zip(stations.iter().cloned()).collect();

    // 4. Morning screening
    let morning_screen_pool: Vec<EmployeeCode> = morning_pool
        .iter()
        .filter(|c| !assignment.morning_lab.contains_key(*c) && has_rate(*c))
        .cloned()
        .collect();
    assignment.morning_screen =
        fill_screening(input, Block::Morning, &morning_screen_pool, &mut counters, &mut events, rng);

    // 5. Afternoon
    if !day.is_last() {
        let preferred = assignment.morning_screen.iter().filter(|c| afternoon_pool.contains(c));
        let others = afternoon_pool.iter().filter(|c| !assignment.morning_screen.contains(c));
        let lab_people: Vec<EmployeeCode> = preferred
            .chain(others)
            .take(config.lab_stations.len())
            .cloned()
            .collect();
        if lab_people.is_empty() {
            warn_empty(&mut events, day, Phase::AfternoonLab);
        }

        let afternoon_lab = derange_stations(input, &lab_people, &assignment.morning_lab, &mut events, rng);

        let afternoon_screen_pool: Vec<EmployeeCode> = afternoon_pool
            .iter()
            .filter(|c| !afternoon_lab.contains_key(*c) && has_rate(*c))
            .cloned()
            .collect();
        let afternoon_screen = fill_screening(
            input,
            Block::Afternoon,
            &afternoon_screen_pool,
            &mut counters,
            &mut events,
            rng,
        );

        assignment.afternoon_lab = Some(afternoon_lab);
        assignment.afternoon_screen = Some(afternoon_screen);
    }

    // 6. Duty / lunch guard
    if let Some(holder) = duty_holder {
        assignment.duty = Some(holder.clone());
    } else if config.lunch_guard_day == Some(day) {
        let not_in_lab: Vec<EmployeeCode> = available
            .iter()
            .filter(|c| !assignment.morning_lab.contains_key(*c))
            .cloned()
            .collect();
        let candidates = if not_in_lab.is_empty() { &available } else { &not_in_lab };
        match rng.choose(candidates) {
            Some(guard) => {
                log::debug!("day={day} lunch guard: {guard}");
                events.push(RosterEvent::LunchGuardAssigned { day, employee: guard.clone() });
                assignment.lunch_guard = Some(guard.clone());
            }
            None => warn_empty(&mut events, day, Phase::LunchGuard),
        }
    }

    events.push(RosterEvent::DayPlanned {
        day,
        morning_lab: assignment.morning_lab.clone(),
        morning_screen: assignment.morning_screen.clone(),
        afternoon_lab: assignment.afternoon_lab.clone(),
        afternoon_screen: assignment.afternoon_screen.clone(),
    });

    DayPlan { assignment, counters, events }
}

/// Draw one block's screeners through the capped selector and count them.
fn fill_screening(
    input: &DayInput<'_>,
    block: Block,
    pool: &[EmployeeCode],
    counters: &mut RunningCounters,
    events: &mut Vec<RosterEvent>,
    rng: &mut RosterRng,
) -> Vec<EmployeeCode> {
    let day = input.day;
    let requested = input.config.screen_slots_per_block;
    if requested == 0 {
        return Vec::new();
    }
    if pool.is_empty() {
        let phase = match block {
            Block::Morning => Phase::MorningScreening,
            Block::Afternoon => Phase::AfternoonScreening,
        };
        warn_empty(events, day, phase);
        return Vec::new();
    }

    let pick = capped_select(
        pool,
        rate_weight(input.rates),
        requested,
        &counters.screen_week_count,
        input.config.screen_weekly_cap,
        input.config.weight_floor,
        rng,
    );

    if pick.chosen.len() < requested {
        log::warn!(
            "day={day} {block:?} screening: filled {}/{requested}",
            pick.chosen.len()
        );
        events.push(RosterEvent::ScreeningShortfall {
            day,
            block,
            requested,
            filled: pick.chosen.len(),
        });
    }
    if !pick.over_cap.is_empty() {
        log::info!("day={day} {block:?} screening: weekly cap exceeded by {:?}", pick.over_cap);
        events.push(RosterEvent::ScreeningCapOverflow {
            day,
            block,
            employees: pick.over_cap.clone(),
        });
    }

    for code in &pick.chosen {
        counters.record_screening(code);
    }
    pick.chosen
}

/// Shuffle stations until nobody keeps their morning station, at most
/// `derangement_attempts` times. The last shuffle stands if none succeeds.
fn derange_stations(
    input: &DayInput<'_>,
    people: &[EmployeeCode],
    morning: &LabLayout,
    events: &mut Vec<RosterEvent>,
    rng: &mut RosterRng,
) -> LabLayout {
    let attempts = input.config.derangement_attempts.max(1);
    let mut stations = input.config.lab_stations.clone();
    let mut layout = LabLayout::new();

    for _ in 0..attempts {
        rng.shuffle(&mut stations);
        layout = people.iter().cloned().zip(stations.iter().cloned()).collect();
        if repeated_stations(&layout, morning).is_empty() {
            return layout;
        }
    }

    let repeated = repeated_stations(&layout, morning);
    log::warn!(
        "day={} afternoon labs: no derangement in {attempts} attempts, {:?} keep their station",
        input.day,
        repeated
    );
    events.push(RosterEvent::DerangementFallback {
        day: input.day,
        attempts,
        repeated,
    });
    layout
}

/// People holding the same station in both layouts.
pub fn repeated_stations(afternoon: &LabLayout, morning: &LabLayout) -> Vec<EmployeeCode> {
    afternoon
        .iter()
        .filter(|(person, station)| morning.get(*person) == Some(*station))
        .map(|(person, _)| person.clone())
        .collect()
}

fn warn_empty(events: &mut Vec<RosterEvent>, day: Weekday, phase: Phase) {
    log::warn!("day={day} {phase:?}: no available candidates");
    events.push(RosterEvent::EmptyPool { day, phase });
}
