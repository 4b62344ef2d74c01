use crate::{
    calendar::{IsoWeek, Weekday},
    snapshot::GeneratedWeek,
    template::CellGrid,
    types::{EmployeeCode, WeekNumber},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Every operation a front end may request.
/// Variants may be added, never removed or reordered.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum RosterCommand {
    // ── Generation ────────────────────────────────
    Generate {
        /// ISO year. Defaults to the current one.
        #[serde(default)]
        year: Option<i32>,
        #[serde(default)]
        week: Option<WeekNumber>,
        #[serde(default)]
        seed: Option<u64>,
        /// Out the whole week.
        #[serde(default)]
        away: Vec<EmployeeCode>,
        /// Per-day absences. Replaces the configured defaults when given.
        #[serde(default)]
        unavailable: Option<BTreeMap<Weekday, Vec<EmployeeCode>>>,
    },

    // ── History and rates ─────────────────────────
    SetWorkRate {
        employee: EmployeeCode,
        rate: i64,
    },
    History,
    ClearHistory,
    ImportSchedule {
        #[serde(default)]
        year: Option<i32>,
        week: WeekNumber,
        cells: CellGrid,
    },
}

/// What a command produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum CommandOutcome {
    Generated { schedule: Box<GeneratedWeek> },
    WorkRateSet { employee: EmployeeCode, rate: u32 },
    History { distribution: Vec<(EmployeeCode, u32)> },
    HistoryCleared { deleted: usize },
    Imported { week: IsoWeek, duties: usize },
}
