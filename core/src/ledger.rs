//! Durable assignment history, as seen by the engine.
//!
//! The engine never owns history: it reads a snapshot of counts before a
//! run and records this week's holders after it. RosterStore implements
//! this over SQLite.
//!
//! RULE: A week is identified by ISO year and week number. Replacing or
//! excluding a week never touches the same week number of another year.

use crate::{
    assignment::Block,
    calendar::{IsoWeek, Weekday},
    error::RosterResult,
    types::{CountMap, EmployeeCode},
};

pub trait DutyLedger {
    /// Employee -> number of recorded duties, across all weeks.
    fn duty_counts(&self) -> RosterResult<CountMap>;

    /// As duty_counts, ignoring one week. Used when regenerating that week.
    fn duty_counts_excluding(&self, week: IsoWeek) -> RosterResult<CountMap>;

    /// Record a week's duty holders, replacing whatever that week held before.
    fn append_duties(&mut self, week: IsoWeek, records: &[(Weekday, EmployeeCode)]) -> RosterResult<()>;

    /// Employee -> number of recorded screening slots, across all weeks.
    fn screening_counts(&self) -> RosterResult<CountMap>;

    /// As screening_counts, ignoring one week.
    fn screening_counts_excluding(&self, week: IsoWeek) -> RosterResult<CountMap>;

    /// Record a week's screeners, replacing whatever that week held before.
    fn append_screenings(
        &mut self,
        week: IsoWeek,
        records: &[(Weekday, Block, EmployeeCode)],
    ) -> RosterResult<()>;
}

/// Counts the planner starts from when (re)generating `week`: every other
/// week on record. Screening history is only read in durable mode.
pub fn history_snapshot(
    ledger: &impl DutyLedger,
    week: IsoWeek,
    durable_screenings: bool,
) -> RosterResult<(CountMap, CountMap)> {
    let duties = ledger.duty_counts_excluding(week)?;
    let screenings = if durable_screenings {
        ledger.screening_counts_excluding(week)?
    } else {
        CountMap::new()
    };
    Ok((duties, screenings))
}
