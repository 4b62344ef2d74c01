//! The engine's output and the counters threaded through a run.

use crate::{
    calendar::Weekday,
    types::{CountMap, EmployeeCode, StationId},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Half-day block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Block {
    Morning,
    Afternoon,
}

/// Employee -> station for one block. Injective by construction.
pub type LabLayout = BTreeMap<EmployeeCode, StationId>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DayAssignment {
    /// Recurring-duty (MDK) holder, only on duty days.
    pub duty: Option<EmployeeCode>,
    pub morning_lab: LabLayout,
    pub morning_screen: Vec<EmployeeCode>,
    /// None on the last day of the week.
    pub afternoon_lab: Option<LabLayout>,
    pub afternoon_screen: Option<Vec<EmployeeCode>>,
    /// Only on the lunch-guard day, only when nobody holds duty.
    pub lunch_guard: Option<EmployeeCode>,
}

impl DayAssignment {
    /// Everyone appearing in any morning slot.
    pub fn morning_people(&self) -> Vec<&EmployeeCode> {
        self.morning_lab.keys().chain(self.morning_screen.iter()).collect()
    }

    /// Everyone appearing in any afternoon slot.
    pub fn afternoon_people(&self) -> Vec<&EmployeeCode> {
        let lab = self.afternoon_lab.iter().flat_map(|l| l.keys());
        let screen = self.afternoon_screen.iter().flatten();
        lab.chain(screen).collect()
    }

    /// Everyone with any slot that day (duty excluded).
    pub fn slot_holders(&self) -> Vec<&EmployeeCode> {
        let mut people = self.morning_people();
        people.extend(self.afternoon_people());
        people.extend(self.lunch_guard.iter());
        people
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeekAssignment {
    pub days: BTreeMap<Weekday, DayAssignment>,
}

impl WeekAssignment {
    pub fn day(&self, day: Weekday) -> Option<&DayAssignment> {
        self.days.get(&day)
    }

    /// (day, holder) for every filled duty, in day order.
    pub fn duties(&self) -> Vec<(Weekday, EmployeeCode)> {
        self.days
            .iter()
            .filter_map(|(day, a)| a.duty.clone().map(|e| (*day, e)))
            .collect()
    }

    /// (day, block, screener) for every screening slot, in day order.
    pub fn screenings(&self) -> Vec<(Weekday, Block, EmployeeCode)> {
        let mut out = Vec::new();
        for (day, a) in &self.days {
            out.extend(a.morning_screen.iter().map(|e| (*day, Block::Morning, e.clone())));
            for e in a.afternoon_screen.iter().flatten() {
                out.push((*day, Block::Afternoon, e.clone()));
            }
        }
        out
    }
}

/// Counters scoped to one generation run.
/// Each day's planning step consumes the previous value and returns the next.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunningCounters {
    /// Duty holdings this week; the same-week duty penalty.
    pub assigned_this_week: CountMap,
    /// Screening slots so far; drives lab rotation priority.
    pub screen_count: CountMap,
    /// Screening slots this week; checked against the soft weekly cap.
    pub screen_week_count: CountMap,
}

impl RunningCounters {
    /// Start a run with lab-priority counters seeded from history.
    pub fn seeded(screen_history: CountMap) -> Self {
        Self {
            screen_count: screen_history,
            ..Self::default()
        }
    }

    pub fn record_screening(&mut self, code: &EmployeeCode) {
        *self.screen_count.entry(code.clone()).or_insert(0) += 1;
        *self.screen_week_count.entry(code.clone()).or_insert(0) += 1;
    }

    pub fn record_duty(&mut self, code: &EmployeeCode) {
        *self.assigned_this_week.entry(code.clone()).or_insert(0) += 1;
    }

    pub fn screens_of(&self, code: &str) -> u32 {
        self.screen_count.get(code).copied().unwrap_or(0)
    }
}
