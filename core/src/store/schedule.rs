//! Store methods for generated schedules.

use crate::{calendar::IsoWeek, error::RosterResult, types::RunId};
use rusqlite::{params, Connection, OptionalExtension};

use super::RosterStore;

/// A persisted schedule, still in its JSON form.
#[derive(Debug, Clone)]
pub struct StoredSchedule {
    pub run_id:          RunId,
    pub week:            IsoWeek,
    pub assignment_json: String,
    pub cells_json:      String,
}

pub(super) fn insert_schedule(conn: &Connection, schedule: &StoredSchedule) -> RosterResult<()> {
    conn.execute(
        "INSERT INTO schedule (run_id, iso_year, week, assignment_json, cells_json)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            schedule.run_id,
            schedule.week.year,
            schedule.week.week,
            schedule.assignment_json,
            schedule.cells_json,
        ],
    )?;
    Ok(())
}

impl RosterStore {
    /// The most recently generated schedule for a week, if any.
    pub fn latest_schedule(&self, week: IsoWeek) -> RosterResult<Option<StoredSchedule>> {
        let schedule = self
            .conn
            .query_row(
                "SELECT s.run_id, s.iso_year, s.week, s.assignment_json, s.cells_json
                 FROM schedule s JOIN run r ON r.run_id = s.run_id
                 WHERE s.iso_year = ?1 AND s.week = ?2
                 ORDER BY r.started_at DESC, s.rowid DESC LIMIT 1",
                params![week.year, week.week],
                |row| {
                    Ok(StoredSchedule {
                        run_id: row.get(0)?,
                        week: IsoWeek { year: row.get(1)?, week: row.get(2)? },
                        assignment_json: row.get(3)?,
                        cells_json: row.get(4)?,
                    })
                },
            )
            .optional()?;
        Ok(schedule)
    }
}
