//! The roster engine: one generation run end to end.
//!
//! RUN ORDER (fixed):
//!   1. Read history snapshot (duties, optional screenings) and work rates,
//!      leaving out the week being generated
//!   2. Plan the week (duties first, then Monday→Friday layout)
//!   3. Render the template cells
//!   4. Record the run in one transaction: run row, this week's duty and
//!      screening records, event log, schedule snapshot
//!
//! RULES:
//!   - The planner never touches the store; it sees snapshots only.
//!   - All randomness flows through one RosterRng per run.
//!   - Each run owns its counters; nothing carries over in memory.

use crate::{
    availability::Availability,
    calendar::IsoWeek,
    command::{CommandOutcome, RosterCommand},
    config::{RosterConfig, ScreeningHistoryMode},
    error::{RosterError, RosterResult},
    event::{EventLogEntry, RosterEvent},
    ledger::{history_snapshot, DutyLedger},
    rng::RosterRng,
    snapshot::GeneratedWeek,
    store::{RosterStore, RunRecord, StoredSchedule},
    template::CellGrid,
    types::{EmployeeCode, RunId, WorkRates},
    week_orchestrator::{plan_week, WeekInput},
};

pub struct RosterEngine {
    pub config: RosterConfig,
    pub store:  RosterStore,
}

impl RosterEngine {
    pub fn new(config: RosterConfig, store: RosterStore) -> Self {
        Self { config, store }
    }

    /// Built-in configuration over a fresh, migrated in-memory store.
    pub fn build_test() -> RosterResult<Self> {
        Self::build_test_with(RosterConfig::default_test())
    }

    pub fn build_test_with(config: RosterConfig) -> RosterResult<Self> {
        config.validate()?;
        let store = RosterStore::in_memory()?;
        store.migrate()?;
        Ok(Self::new(config, store))
    }

    /// Configured default for every roster member, overridden by persisted rates.
    /// Persisted rates for people no longer on the roster are ignored.
    pub fn effective_work_rates(&self) -> RosterResult<WorkRates> {
        let persisted = self.store.work_rates()?;
        Ok(self
            .config
            .employees
            .iter()
            .map(|code| {
                let rate = persisted.get(code).copied().unwrap_or(self.config.default_work_rate);
                (code.clone(), rate)
            })
            .collect())
    }

    pub fn set_work_rate(&self, employee: &str, rate: i64) -> RosterResult<u32> {
        if !self.config.is_member(employee) {
            return Err(RosterError::UnknownEmployee { code: employee.to_string() });
        }
        let rate = u32::try_from(rate)
            .ok()
            .filter(|r| *r <= 100)
            .ok_or_else(|| RosterError::InvalidWorkRate { code: employee.to_string(), rate })?;
        self.store.upsert_work_rate(employee, rate)?;
        log::info!("work rate: {employee} = {rate}%");
        Ok(rate)
    }

    /// Generate, persist and return one week's schedule.
    ///
    /// Regenerating a week sees the same history as its first generation,
    /// so the same seed reproduces the same schedule.
    pub fn generate_week(
        &mut self,
        week: IsoWeek,
        availability: &Availability,
        seed: u64,
    ) -> RosterResult<GeneratedWeek> {
        let run_id: RunId = format!("{week}-{}", uuid::Uuid::new_v4());
        log::info!("run {run_id}: generating week {week} with seed {seed}");

        let durable = self.config.screening_history == ScreeningHistoryMode::Durable;
        let (duty_history, screen_history) = history_snapshot(&self.store, week, durable)?;
        let rates = self.effective_work_rates()?;

        let mut rng = RosterRng::for_week(seed, week);
        let input = WeekInput {
            config: &self.config,
            availability,
            rates: &rates,
            duty_history: &duty_history,
            screen_history: &screen_history,
        };
        let plan = plan_week(&input, &mut rng);

        let cells = self.config.template.render(week.week, &plan.assignment);

        let mut events = Vec::with_capacity(plan.events.len() + 2);
        events.push(RosterEvent::RunInitialized { run_id: run_id.clone(), week, seed });
        events.extend(plan.events);
        let warnings = events.iter().filter(|e| e.is_warning()).count();
        events.push(RosterEvent::RunCompleted { run_id: run_id.clone(), week, warnings });

        let schedule = StoredSchedule {
            run_id: run_id.clone(),
            week,
            assignment_json: serde_json::to_string(&plan.assignment)?,
            cells_json: serde_json::to_string(&cells)?,
        };
        self.store.record_run(&RunRecord {
            run_id: &run_id,
            week,
            seed,
            version: env!("CARGO_PKG_VERSION"),
            duties: &plan.assignment.duties(),
            screenings: &plan.assignment.screenings(),
            events: &log_entries(&run_id, week, &events)?,
            schedule: &schedule,
        })?;

        if warnings > 0 {
            log::warn!("run {run_id}: week {week} generated with {warnings} warnings");
        }

        Ok(GeneratedWeek {
            run_id,
            week,
            seed,
            assignment: plan.assignment,
            cells,
            events,
        })
    }

    /// Read duty holders from a filled template and record them for `week`.
    /// Returns how many duties were imported.
    pub fn import_schedule(&mut self, week: IsoWeek, cells: &CellGrid) -> RosterResult<usize> {
        let duties = self.config.template.extract_duties(cells, &self.config.employees);
        if duties.is_empty() {
            log::info!("import: no valid duty holders found for week {week}");
            return Ok(0);
        }
        self.store.append_duties(week, &duties)?;
        log::info!("import: recorded {} duties for week {week}", duties.len());
        Ok(duties.len())
    }

    /// Historical duty counts, most-loaded first, ties by code.
    pub fn duty_distribution(&self) -> RosterResult<Vec<(EmployeeCode, u32)>> {
        let mut distribution: Vec<_> = self.store.duty_counts()?.into_iter().collect();
        distribution.sort_by(|(a, x), (b, y)| y.cmp(x).then_with(|| a.cmp(b)));
        Ok(distribution)
    }

    pub fn clear_duty_history(&self) -> RosterResult<usize> {
        self.store.clear_duty_history()
    }

    /// Dispatch a front-end command.
    pub fn apply(&mut self, command: RosterCommand) -> RosterResult<CommandOutcome> {
        match command {
            RosterCommand::Generate { year, week, seed, away, unavailable } => {
                let week = IsoWeek::resolve(year, week)?;
                let mut availability = match &unavailable {
                    Some(_) => Availability::new(&self.config.employees),
                    None => Availability::with_defaults(&self.config),
                };
                for code in &away {
                    availability.mark_week_unavailable(code)?;
                }
                for (day, codes) in unavailable.iter().flatten() {
                    for code in codes {
                        availability.mark_day_unavailable(*day, code)?;
                    }
                }
                let seed = seed.unwrap_or_else(clock_seed);
                let schedule = self.generate_week(week, &availability, seed)?;
                Ok(CommandOutcome::Generated { schedule: Box::new(schedule) })
            }
            RosterCommand::SetWorkRate { employee, rate } => {
                let rate = self.set_work_rate(&employee, rate)?;
                Ok(CommandOutcome::WorkRateSet { employee, rate })
            }
            RosterCommand::History => Ok(CommandOutcome::History {
                distribution: self.duty_distribution()?,
            }),
            RosterCommand::ClearHistory => Ok(CommandOutcome::HistoryCleared {
                deleted: self.clear_duty_history()?,
            }),
            RosterCommand::ImportSchedule { year, week, cells } => {
                let week = IsoWeek::resolve(year, Some(week))?;
                let duties = self.import_schedule(week, &cells)?;
                Ok(CommandOutcome::Imported { week, duties })
            }
        }
    }
}

/// Number a run's events in planning order, ready for the event log.
fn log_entries(run_id: &str, week: IsoWeek, events: &[RosterEvent]) -> RosterResult<Vec<EventLogEntry>> {
    events
        .iter()
        .enumerate()
        .map(|(seq, event)| -> RosterResult<EventLogEntry> {
            Ok(EventLogEntry {
                id:         None,
                run_id:     run_id.to_string(),
                week,
                seq:        seq as u32,
                event_type: event.type_name().to_string(),
                payload:    serde_json::to_string(event)?,
            })
        })
        .collect()
}

/// Seed for runs that did not ask for one: wall-clock nanoseconds.
pub fn clock_seed() -> u64 {
    let now = chrono::Utc::now();
    now.timestamp_nanos_opt().unwrap_or_else(|| now.timestamp()) as u64
}
