//! The run event log: everything the planner wants the caller to know.
//!
//! RULE: Non-fatal planner conditions (empty pools, shortfalls, soft-cap
//! overflow, derangement fallback) are reported as events, never as errors.
//! Events are appended in planning order and persisted as-is.

use crate::{
    assignment::Block,
    calendar::{IsoWeek, Weekday},
    types::{EmployeeCode, RunId, StationId},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The planning phase an event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Duty,
    MorningLab,
    MorningScreening,
    AfternoonLab,
    AfternoonScreening,
    LunchGuard,
}

/// Every event emitted during a generation run.
/// Variants may be added, never removed or reordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RosterEvent {
    // ── Run events ─────────────────────────────────
    RunInitialized {
        run_id: RunId,
        week: IsoWeek,
        seed: u64,
    },
    RunCompleted {
        run_id: RunId,
        week: IsoWeek,
        warnings: usize,
    },

    // ── Duty events ────────────────────────────────
    DutyAssigned {
        day: Weekday,
        employee: EmployeeCode,
        score: f64,
    },
    DutyUnfilled {
        day: Weekday,
    },

    // ── Day layout events ──────────────────────────
    DayPlanned {
        day: Weekday,
        morning_lab: BTreeMap<EmployeeCode, StationId>,
        morning_screen: Vec<EmployeeCode>,
        afternoon_lab: Option<BTreeMap<EmployeeCode, StationId>>,
        afternoon_screen: Option<Vec<EmployeeCode>>,
    },
    LunchGuardAssigned {
        day: Weekday,
        employee: EmployeeCode,
    },

    // ── Warnings ───────────────────────────────────
    EmptyPool {
        day: Weekday,
        phase: Phase,
    },
    ScreeningShortfall {
        day: Weekday,
        block: Block,
        requested: usize,
        filled: usize,
    },
    ScreeningCapOverflow {
        day: Weekday,
        block: Block,
        employees: Vec<EmployeeCode>,
    },
    DerangementFallback {
        day: Weekday,
        attempts: u32,
        repeated: Vec<EmployeeCode>,
    },
}

impl RosterEvent {
    /// Stable name for the event_type column in event_log.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::RunInitialized { .. }       => "run_initialized",
            Self::RunCompleted { .. }         => "run_completed",
            Self::DutyAssigned { .. }         => "duty_assigned",
            Self::DutyUnfilled { .. }         => "duty_unfilled",
            Self::DayPlanned { .. }           => "day_planned",
            Self::LunchGuardAssigned { .. }   => "lunch_guard_assigned",
            Self::EmptyPool { .. }            => "empty_pool",
            Self::ScreeningShortfall { .. }   => "screening_shortfall",
            Self::ScreeningCapOverflow { .. } => "screening_cap_overflow",
            Self::DerangementFallback { .. }  => "derangement_fallback",
        }
    }

    /// Warning-level events, surfaced to the user after generation.
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            Self::DutyUnfilled { .. }
                | Self::EmptyPool { .. }
                | Self::ScreeningShortfall { .. }
                | Self::ScreeningCapOverflow { .. }
                | Self::DerangementFallback { .. }
        )
    }
}

/// A persisted event row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventLogEntry {
    pub id:         Option<i64>,
    pub run_id:     RunId,
    pub week:       IsoWeek,
    pub seq:        u32,
    pub event_type: String,
    pub payload:    String,
}
