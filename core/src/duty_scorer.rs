//! Least-loaded selection for the recurring duty (MDK).
//!
//! score(e) = history(e) / (work_rate(e) / 100) + penalty × assigned_this_week(e)
//!
//! Lower is better. A zero work rate scores +inf. Ties go to the
//! lexicographically smallest code.

use crate::{
    assignment::RunningCounters,
    availability::Availability,
    calendar::Weekday,
    config::RosterConfig,
    event::{Phase, RosterEvent},
    types::{CountMap, EmployeeCode, WorkRates},
};
use std::collections::BTreeMap;

pub fn duty_score(
    code: &str,
    history: &CountMap,
    rates: &WorkRates,
    assigned_this_week: &CountMap,
    repeat_penalty: f64,
) -> f64 {
    let history_count = history.get(code).copied().unwrap_or(0) as f64;
    let rate_factor = rates.get(code).copied().unwrap_or(0) as f64 / 100.0;
    let this_week = assigned_this_week.get(code).copied().unwrap_or(0) as f64;

    let load = if rate_factor > 0.0 { history_count / rate_factor } else { f64::INFINITY };
    load + repeat_penalty * this_week
}

/// Pick the minimum-score candidate. None for an empty pool.
pub fn select_duty_holder(
    candidates: &[EmployeeCode],
    history: &CountMap,
    rates: &WorkRates,
    assigned_this_week: &CountMap,
    repeat_penalty: f64,
) -> Option<(EmployeeCode, f64)> {
    let mut best: Option<(&EmployeeCode, f64)> = None;
    for code in candidates {
        let score = duty_score(code, history, rates, assigned_this_week, repeat_penalty);
        let better = match best {
            None => true,
            Some((held, held_score)) => {
                score < held_score || (score == held_score && code < held)
            }
        };
        if better {
            best = Some((code, score));
        }
    }
    best.map(|(code, score)| (code.clone(), score))
}

/// Duty holders for the week, decided before any day is laid out.
pub struct DutyPlan {
    pub holders: BTreeMap<Weekday, EmployeeCode>,
    pub counters: RunningCounters,
    pub events: Vec<RosterEvent>,
}

/// Run the scorer over every duty day in Monday→Friday order, threading the
/// same-week counter so later days lean away from earlier holders.
pub fn plan_duties(
    config: &RosterConfig,
    availability: &Availability,
    history: &CountMap,
    rates: &WorkRates,
    mut counters: RunningCounters,
) -> DutyPlan {
    let mut holders = BTreeMap::new();
    let mut events = Vec::new();

    for day in config.ordered_duty_days() {
        let eligible: Vec<EmployeeCode> = availability
            .available_on(day)
            .into_iter()
            .filter(|c| rates.get(c).copied().unwrap_or(0) > 0)
            .collect();

        let picked = select_duty_holder(
            &eligible,
            history,
            rates,
            &counters.assigned_this_week,
            config.duty_repeat_penalty,
        );

        match picked {
            Some((employee, score)) => {
                log::debug!("day={day} duty: {employee} (score {score:.2})");
                counters.record_duty(&employee);
                holders.insert(day, employee.clone());
                events.push(RosterEvent::DutyAssigned { day, employee, score });
            }
            None => {
                log::warn!("day={day} duty: no eligible employee");
                events.push(RosterEvent::EmptyPool { day, phase: Phase::Duty });
                events.push(RosterEvent::DutyUnfilled { day });
            }
        }
    }

    DutyPlan { holders, counters, events }
}
