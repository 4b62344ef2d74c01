//! Store methods for persisted work-rate overrides.

use crate::{error::RosterResult, types::WorkRates};
use rusqlite::params;

use super::RosterStore;

impl RosterStore {
    /// Persisted overrides only. Callers merge these over the configured default.
    pub fn work_rates(&self) -> RosterResult<WorkRates> {
        let mut stmt = self.conn.prepare("SELECT employee, rate FROM work_rate")?;
        let rates = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, u32>(1)?)))?
            .collect::<Result<WorkRates, _>>()?;
        Ok(rates)
    }

    /// Insert or replace one employee's work rate. Range is checked by the caller.
    pub fn upsert_work_rate(&self, employee: &str, rate: u32) -> RosterResult<()> {
        self.conn.execute(
            "INSERT INTO work_rate (employee, rate) VALUES (?1, ?2)
             ON CONFLICT(employee) DO UPDATE SET rate = excluded.rate",
            params![employee, rate],
        )?;
        Ok(())
    }
}
