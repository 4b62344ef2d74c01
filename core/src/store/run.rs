//! Store methods for generation runs and their event log.
//!
//! RULE: A run is recorded in one transaction. Either its history rows,
//! events and schedule all land, or none of them do.

use crate::{
    assignment::Block,
    calendar::{IsoWeek, Weekday},
    error::RosterResult,
    event::EventLogEntry,
    types::EmployeeCode,
};
use rusqlite::{params, Connection};

use super::{history, schedule, RosterStore, StoredSchedule};

/// Everything one generation run persists.
pub struct RunRecord<'a> {
    pub run_id:     &'a str,
    pub week:       IsoWeek,
    pub seed:       u64,
    pub version:    &'a str,
    pub duties:     &'a [(Weekday, EmployeeCode)],
    pub screenings: &'a [(Weekday, Block, EmployeeCode)],
    pub events:     &'a [EventLogEntry],
    pub schedule:   &'a StoredSchedule,
}

fn insert_run(conn: &Connection, record: &RunRecord<'_>) -> RosterResult<()> {
    conn.execute(
        "INSERT INTO run (run_id, iso_year, week, seed, version, started_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            record.run_id,
            record.week.year,
            record.week.week,
            record.seed as i64,
            record.version,
            chrono::Utc::now().to_rfc3339(),
        ],
    )?;
    Ok(())
}

fn insert_event(conn: &Connection, entry: &EventLogEntry) -> RosterResult<()> {
    conn.execute(
        "INSERT INTO event_log (run_id, iso_year, week, seq, event_type, payload)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            entry.run_id,
            entry.week.year,
            entry.week.week,
            entry.seq,
            entry.event_type,
            entry.payload,
        ],
    )?;
    Ok(())
}

impl RosterStore {
    /// Persist a finished run: the run row, the week's history, the event
    /// log and the schedule snapshot.
    pub fn record_run(&mut self, record: &RunRecord<'_>) -> RosterResult<()> {
        let tx = self.conn.transaction()?;
        insert_run(&tx, record)?;
        history::replace_duties(&tx, record.week, record.duties)?;
        history::replace_screenings(&tx, record.week, record.screenings)?;
        for entry in record.events {
            insert_event(&tx, entry)?;
        }
        schedule::insert_schedule(&tx, record.schedule)?;
        tx.commit()?;
        log::debug!("run {}: {} events persisted", record.run_id, record.events.len());
        Ok(())
    }

    pub fn run_count(&self) -> RosterResult<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM run", [], |row| row.get(0))?;
        Ok(count)
    }

    pub fn events_for_run(&self, run_id: &str) -> RosterResult<Vec<EventLogEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, run_id, iso_year, week, seq, event_type, payload
             FROM event_log WHERE run_id = ?1
             ORDER BY seq ASC, id ASC",
        )?;
        let entries = stmt
            .query_map(params![run_id], |row| {
                Ok(EventLogEntry {
                    id: Some(row.get(0)?),
                    run_id: row.get(1)?,
                    week: IsoWeek { year: row.get(2)?, week: row.get(3)? },
                    seq: row.get(4)?,
                    event_type: row.get(5)?,
                    payload: row.get(6)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }
}
