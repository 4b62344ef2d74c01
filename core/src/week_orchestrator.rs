//! One full week: duties first, then each day's layout in fixed order.
//!
//! ORDERING (fixed, never reordered):
//!   1. Duty scorer over every duty day, Monday→Friday.
//!   2. Day planner Monday→Friday, each day fed the previous day's counters.
//!
//! Duty holders must not depend on lab/screen layout; layout depends on duty.

use crate::{
    assignment::{RunningCounters, WeekAssignment},
    availability::Availability,
    calendar::Weekday,
    config::RosterConfig,
    day_planner::{plan_day, DayInput},
    duty_scorer::plan_duties,
    event::RosterEvent,
    rng::RosterRng,
    types::{CountMap, WorkRates},
};

/// Snapshot of everything the engine reads for one run.
pub struct WeekInput<'a> {
    pub config:         &'a RosterConfig,
    pub availability:   &'a Availability,
    pub rates:          &'a WorkRates,
    pub duty_history:   &'a CountMap,
    /// Lab-priority seed; empty unless screening history is durable.
    pub screen_history: &'a CountMap,
}

pub struct WeekPlan {
    pub assignment: WeekAssignment,
    pub counters:   RunningCounters,
    pub events:     Vec<RosterEvent>,
}

impl WeekPlan {
    pub fn warnings(&self) -> impl Iterator<Item = &RosterEvent> {
        self.events.iter().filter(|e| e.is_warning())
    }
}

pub fn plan_week(input: &WeekInput<'_>, rng: &mut RosterRng) -> WeekPlan {
    let counters = RunningCounters::seeded(input.screen_history.clone());

    let duty_plan = plan_duties(
        input.config,
        input.availability,
        input.duty_history,
        input.rates,
        counters,
    );
    let mut events = duty_plan.events;
    let mut counters = duty_plan.counters;
    let mut assignment = WeekAssignment::default();

    for day in Weekday::ALL {
        let day_input = DayInput {
            day,
            config: input.config,
            availability: input.availability,
            rates: input.rates,
            duty_holder: duty_plan.holders.get(&day),
        };
        let plan = plan_day(&day_input, counters, rng);
        counters = plan.counters;
        events.extend(plan.events);
        assignment.days.insert(day, plan.assignment);
    }

    log::info!(
        "week planned: {} duties, {} screening slots, {} warnings",
        assignment.duties().len(),
        assignment.screenings().len(),
        events.iter().filter(|e| e.is_warning()).count()
    );

    WeekPlan { assignment, counters, events }
}
