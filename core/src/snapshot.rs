//! A finished generation run, as the engine hands back and persists.
//!
//! The snapshot carries everything needed to re-render or audit a week
//! without re-running the planner: the assignment, its rendered template
//! cells, and the ordered event log.

use crate::{
    assignment::WeekAssignment,
    calendar::IsoWeek,
    event::RosterEvent,
    template::CellGrid,
    types::RunId,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedWeek {
    pub run_id:     RunId,
    pub week:       IsoWeek,
    pub seed:       u64,
    pub assignment: WeekAssignment,
    pub cells:      CellGrid,
    pub events:     Vec<RosterEvent>,
}

impl GeneratedWeek {
    pub fn warnings(&self) -> Vec<&RosterEvent> {
        self.events.iter().filter(|e| e.is_warning()).collect()
    }
}
