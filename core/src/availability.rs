//! Who can work which day of the planned week.
//!
//! Recomputed from user input every run, never persisted.

use crate::{
    calendar::Weekday,
    config::RosterConfig,
    error::{RosterError, RosterResult},
    types::EmployeeCode,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Availability {
    roster: Vec<EmployeeCode>,
    week_unavailable: BTreeSet<EmployeeCode>,
    per_day: BTreeMap<Weekday, BTreeSet<EmployeeCode>>,
}

impl Availability {
    /// Everyone on the roster available every day.
    pub fn new(roster: &[EmployeeCode]) -> Self {
        Self {
            roster: roster.to_vec(),
            ..Self::default()
        }
    }

    /// Roster with the configured per-day absences pre-filled.
    pub fn with_defaults(config: &RosterConfig) -> Self {
        let mut availability = Self::new(&config.employees);
        for (day, codes) in &config.default_unavailable {
            for code in codes {
                // Unknown codes are rejected by RosterConfig::validate.
                let _ = availability.mark_day_unavailable(*day, code);
            }
        }
        availability
    }

    /// Exclude an employee from the whole week.
    /// Drops any per-day entries they had, as the day form no longer offers them.
    pub fn mark_week_unavailable(&mut self, code: &str) -> RosterResult<()> {
        self.check_member(code)?;
        self.week_unavailable.insert(code.to_string());
        for codes in self.per_day.values_mut() {
            codes.remove(code);
        }
        Ok(())
    }

    /// Exclude an employee from one day. Ignored when already out all week.
    pub fn mark_day_unavailable(&mut self, day: Weekday, code: &str) -> RosterResult<()> {
        self.check_member(code)?;
        if !self.week_unavailable.contains(code) {
            self.per_day.entry(day).or_default().insert(code.to_string());
        }
        Ok(())
    }

    /// Roster members available at some point this week, in roster order.
    pub fn week_available(&self) -> Vec<EmployeeCode> {
        self.roster
            .iter()
            .filter(|c| !self.week_unavailable.contains(*c))
            .cloned()
            .collect()
    }

    /// Week-available minus today's absentees, in roster order.
    pub fn available_on(&self, day: Weekday) -> Vec<EmployeeCode> {
        let absent = self.per_day.get(&day);
        self.week_available()
            .into_iter()
            .filter(|c| absent.map_or(true, |a| !a.contains(c)))
            .collect()
    }

    pub fn unavailable_on(&self, day: Weekday) -> Vec<EmployeeCode> {
        self.per_day
            .get(&day)
            .map(|codes| codes.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn week_unavailable(&self) -> Vec<EmployeeCode> {
        self.week_unavailable.iter().cloned().collect()
    }

    fn check_member(&self, code: &str) -> RosterResult<()> {
        if self.roster.iter().any(|c| c == code) {
            Ok(())
        } else {
            Err(RosterError::UnknownEmployee { code: code.to_string() })
        }
    }
}
