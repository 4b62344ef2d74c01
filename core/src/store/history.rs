//! Store methods for duty and screening history.

use crate::{
    assignment::Block,
    calendar::{IsoWeek, Weekday},
    error::RosterResult,
    ledger::DutyLedger,
    types::{CountMap, EmployeeCode},
};
use rusqlite::{params, Connection};

use super::RosterStore;

impl RosterStore {
    /// Every recorded duty, ordered by week then weekday.
    pub fn duty_records(&self) -> RosterResult<Vec<(IsoWeek, Weekday, EmployeeCode)>> {
        let mut stmt = self.conn.prepare(
            "SELECT iso_year, week, day, employee FROM duty_assignment",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    IsoWeek { year: row.get(0)?, week: row.get(1)? },
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut records = rows
            .into_iter()
            .map(|(week, day, employee)| -> RosterResult<_> {
                Ok((week, day.parse::<Weekday>()?, employee))
            })
            .collect::<RosterResult<Vec<_>>>()?;
        records.sort();
        Ok(records)
    }

    /// Remove all duty history. Returns the number of records deleted.
    pub fn clear_duty_history(&self) -> RosterResult<usize> {
        let deleted = self.conn.execute("DELETE FROM duty_assignment", [])?;
        log::info!("store: cleared {deleted} duty records");
        Ok(deleted)
    }

    /// Employee counts in a history table, skipping `skip` when given.
    fn count_by_employee(&self, table: &str, skip: Option<IsoWeek>) -> RosterResult<CountMap> {
        let sql = format!(
            "SELECT employee, COUNT(*) FROM {table}
             WHERE ?1 IS NULL OR NOT (iso_year = ?1 AND week = ?2)
             GROUP BY employee"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let counts = stmt
            .query_map(params![skip.map(|w| w.year), skip.map(|w| w.week)], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, u32>(1)?))
            })?
            .collect::<Result<CountMap, _>>()?;
        Ok(counts)
    }
}

/// Replace one week's duty rows. The caller owns the transaction.
pub(super) fn replace_duties(
    conn: &Connection,
    week: IsoWeek,
    records: &[(Weekday, EmployeeCode)],
) -> RosterResult<()> {
    conn.execute(
        "DELETE FROM duty_assignment WHERE iso_year = ?1 AND week = ?2",
        params![week.year, week.week],
    )?;
    for (day, employee) in records {
        conn.execute(
            "INSERT INTO duty_assignment (iso_year, week, day, employee)
             VALUES (?1, ?2, ?3, ?4)",
            params![week.year, week.week, day.name(), employee],
        )?;
    }
    Ok(())
}

/// Replace one week's screening rows. The caller owns the transaction.
pub(super) fn replace_screenings(
    conn: &Connection,
    week: IsoWeek,
    records: &[(Weekday, Block, EmployeeCode)],
) -> RosterResult<()> {
    conn.execute(
        "DELETE FROM screening_assignment WHERE iso_year = ?1 AND week = ?2",
        params![week.year, week.week],
    )?;
    for (day, block, employee) in records {
        let block = match block {
            Block::Morning => "morning",
            Block::Afternoon => "afternoon",
        };
        conn.execute(
            "INSERT OR IGNORE INTO screening_assignment (iso_year, week, day, block, employee)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![week.year, week.week, day.name(), block, employee],
        )?;
    }
    Ok(())
}

impl DutyLedger for RosterStore {
    fn duty_counts(&self) -> RosterResult<CountMap> {
        self.count_by_employee("duty_assignment", None)
    }

    fn duty_counts_excluding(&self, week: IsoWeek) -> RosterResult<CountMap> {
        self.count_by_employee("duty_assignment", Some(week))
    }

    fn append_duties(&mut self, week: IsoWeek, records: &[(Weekday, EmployeeCode)]) -> RosterResult<()> {
        let tx = self.conn.transaction()?;
        replace_duties(&tx, week, records)?;
        tx.commit()?;
        Ok(())
    }

    fn screening_counts(&self) -> RosterResult<CountMap> {
        self.count_by_employee("screening_assignment", None)
    }

    fn screening_counts_excluding(&self, week: IsoWeek) -> RosterResult<CountMap> {
        self.count_by_employee("screening_assignment", Some(week))
    }

    fn append_screenings(
        &mut self,
        week: IsoWeek,
        records: &[(Weekday, Block, EmployeeCode)],
    ) -> RosterResult<()> {
        let tx = self.conn.transaction()?;
        replace_screenings(&tx, week, records)?;
        tx.commit()?;
        Ok(())
    }
}
