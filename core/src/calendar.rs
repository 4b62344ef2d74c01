//! Working-week calendar: the five planned days and the ISO week.

use crate::error::{RosterError, RosterResult};
use crate::types::WeekNumber;
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl Weekday {
    /// Fixed planning order. Never reordered.
    pub const ALL: [Weekday; 5] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Monday    => "Monday",
            Self::Tuesday   => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday  => "Thursday",
            Self::Friday    => "Friday",
        }
    }

    /// Display name used on the printed schedule.
    pub fn swedish_name(&self) -> &'static str {
        match self {
            Self::Monday    => "Måndag",
            Self::Tuesday   => "Tisdag",
            Self::Wednesday => "Onsdag",
            Self::Thursday  => "Torsdag",
            Self::Friday    => "Fredag",
        }
    }

    /// The last day of the week has no afternoon block.
    pub fn is_last(&self) -> bool {
        *self == Weekday::Friday
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Weekday {
    type Err = RosterError;

    /// Accepts English or Swedish names, any case.
    fn from_str(s: &str) -> RosterResult<Self> {
        let wanted = s.trim().to_lowercase();
        Weekday::ALL
            .into_iter()
            .find(|d| d.name().to_lowercase() == wanted || d.swedish_name().to_lowercase() == wanted)
            .ok_or_else(|| RosterError::UnknownDay { name: s.to_string() })
    }
}

/// A week identified by ISO year and week number, e.g. 2026-W05.
///
/// History is keyed by both: week 5 of one year never replaces or hides
/// week 5 of another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct IsoWeek {
    pub year: i32,
    pub week: WeekNumber,
}

impl IsoWeek {
    /// Rejects week 0, weeks past 53, and week 53 in 52-week years.
    pub fn new(year: i32, week: WeekNumber) -> RosterResult<Self> {
        chrono::NaiveDate::from_isoywd_opt(year, week, chrono::Weekday::Mon)
            .map(|_| Self { year, week })
            .ok_or(RosterError::InvalidWeek { year, week })
    }

    /// The ISO week containing `date`.
    pub fn containing(date: chrono::NaiveDate) -> Self {
        let iso = date.iso_week();
        Self { year: iso.year(), week: iso.week() }
    }

    /// Resolve a partially given week against today.
    pub fn resolve(year: Option<i32>, week: Option<WeekNumber>) -> RosterResult<Self> {
        let today = current_iso_week();
        Self::new(year.unwrap_or(today.year), week.unwrap_or(today.week))
    }
}

impl fmt::Display for IsoWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-W{:02}", self.year, self.week)
    }
}

/// ISO week of today, in local time.
pub fn current_iso_week() -> IsoWeek {
    IsoWeek::containing(chrono::Local::now().date_naive())
}
