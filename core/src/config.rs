use crate::{
    calendar::Weekday,
    error::{RosterError, RosterResult},
    template::TemplateLayout,
    types::{EmployeeCode, StationId},
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// How much of the day a recurring duty (MDK) occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DutyKind {
    /// Holder is out of every slot that day.
    FullDay,
    /// Holder is out of the morning block only.
    HalfDayMorning,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DutyDay {
    pub day: Weekday,
    pub kind: DutyKind,
}

/// Whether screening counters survive between generation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreeningHistoryMode {
    /// Counters start at zero every run.
    PerRun,
    /// Lab-priority counters are seeded from persisted screening records.
    Durable,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterConfig {
    /// Ordered roster. Order is the tie-break order for lab priority.
    pub employees: Vec<EmployeeCode>,
    /// Pre-filled per-day absences offered to the user each week.
    #[serde(default)]
    pub default_unavailable: BTreeMap<Weekday, Vec<EmployeeCode>>,
    /// Work rate assumed for anyone without a persisted override.
    #[serde(default = "default_work_rate")]
    pub default_work_rate: u32,
    pub lab_stations: Vec<StationId>,
    #[serde(default = "default_one")]
    pub screen_slots_per_block: usize,
    /// Soft cap: prefer no more than this many screening slots per person per week.
    #[serde(default = "default_one_u32")]
    pub screen_weekly_cap: u32,
    pub duty_days: Vec<DutyDay>,
    #[serde(default)]
    pub lunch_guard_day: Option<Weekday>,
    #[serde(default = "default_derangement_attempts")]
    pub derangement_attempts: u32,
    /// Score added per duty already held this week.
    #[serde(default = "default_duty_repeat_penalty")]
    pub duty_repeat_penalty: f64,
    /// Minimum sampling weight; keeps zero-weight candidates drawable.
    #[serde(default = "default_weight_floor")]
    pub weight_floor: f64,
    #[serde(default = "default_screening_history")]
    pub screening_history: ScreeningHistoryMode,
    #[serde(default)]
    pub template: TemplateLayout,
}

fn default_work_rate() -> u32 { 100 }
fn default_one() -> usize { 1 }
fn default_one_u32() -> u32 { 1 }
fn default_derangement_attempts() -> u32 { 10 }
fn default_duty_repeat_penalty() -> f64 { 10.0 }
fn default_weight_floor() -> f64 { 0.001 }
fn default_screening_history() -> ScreeningHistoryMode { ScreeningHistoryMode::PerRun }

impl RosterConfig {
    /// Load from the data/ directory.
    /// In tests, use RosterConfig::default_test().
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let path = format!("{data_dir}/roster.json");
        let content = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: RosterConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        config.validate()?;
        log::debug!(
            "config: loaded {} employees, {} stations from {path}",
            config.employees.len(),
            config.lab_stations.len()
        );
        Ok(config)
    }

    /// Reject configurations the planner cannot honour.
    pub fn validate(&self) -> RosterResult<()> {
        let mut seen = BTreeSet::new();
        for code in &self.employees {
            if code.trim().is_empty() || !seen.insert(code.as_str()) {
                return Err(invalid(format!("duplicate or empty employee code '{code}'")));
            }
        }
        let stations: BTreeSet<_> = self.lab_stations.iter().collect();
        if stations.is_empty() || stations.len() != self.lab_stations.len() {
            return Err(invalid("lab stations must be non-empty and distinct".into()));
        }
        let duty: BTreeSet<_> = self.duty_days.iter().map(|d| d.day).collect();
        if duty.len() != self.duty_days.len() {
            return Err(invalid("a day may hold at most one duty slot".into()));
        }
        if self.default_work_rate > 100 {
            return Err(RosterError::InvalidWorkRate {
                code: "<default>".into(),
                rate: self.default_work_rate as i64,
            });
        }
        if self.derangement_attempts == 0 {
            return Err(invalid("derangement_attempts must be at least 1".into()));
        }
        if !(self.weight_floor > 0.0) {
            return Err(invalid("weight_floor must be positive".into()));
        }
        for (day, codes) in &self.default_unavailable {
            if let Some(code) = codes.iter().find(|c| !self.is_member(c)) {
                return Err(invalid(format!("default absence on {day} names unknown '{code}'")));
            }
        }
        self.template.validate()?;
        if let Some(station) = self.lab_stations.iter().find(|s| !self.template.has_station(s)) {
            return Err(invalid(format!("template has no rows for station '{station}'")));
        }
        Ok(())
    }

    pub fn is_member(&self, code: &str) -> bool {
        self.employees.iter().any(|e| e == code)
    }

    /// The duty kind for a day, if that day carries a duty slot.
    pub fn duty_kind(&self, day: Weekday) -> Option<DutyKind> {
        self.duty_days.iter().find(|d| d.day == day).map(|d| d.kind)
    }

    /// Duty days in fixed Monday→Friday order, regardless of file order.
    pub fn ordered_duty_days(&self) -> Vec<Weekday> {
        Weekday::ALL
            .into_iter()
            .filter(|d| self.duty_kind(*d).is_some())
            .collect()
    }

    /// Built-in configuration: the unit's real roster and template.
    pub fn default_test() -> Self {
        let employees = ["AH", "LS", "DS", "KL", "TH", "LAO", "AL", "HS", "AG", "CB", "NC"]
            .into_iter()
            .map(String::from)
            .collect();

        let absences = |codes: &[&str]| codes.iter().map(|c| c.to_string()).collect::<Vec<_>>();
        let default_unavailable = [
            (Weekday::Monday,    absences(&["DS", "HS", "LS"])),
            (Weekday::Tuesday,   absences(&["LAO", "CB", "HS", "LS"])),
            (Weekday::Wednesday, absences(&["DS", "AH", "CB", "KL"])),
            (Weekday::Thursday,  absences(&["CB", "KL", "NC"])),
            (Weekday::Friday,    absences(&["CB", "AL", "KL"])),
        ]
        .into();

        Self {
            employees,
            default_unavailable,
            default_work_rate: 100,
            lab_stations: vec!["LAB 3".into(), "LAB 6".into(), "LAB 9".into(), "LAB 10".into()],
            screen_slots_per_block: 1,
            screen_weekly_cap: 1,
            duty_days: vec![
                DutyDay { day: Weekday::Monday,   kind: DutyKind::HalfDayMorning },
                DutyDay { day: Weekday::Tuesday,  kind: DutyKind::FullDay },
                DutyDay { day: Weekday::Thursday, kind: DutyKind::FullDay },
            ],
            lunch_guard_day: Some(Weekday::Wednesday),
            derangement_attempts: 10,
            duty_repeat_penalty: 10.0,
            weight_floor: 0.001,
            screening_history: ScreeningHistoryMode::PerRun,
            template: TemplateLayout::default(),
        }
    }

    /// Same rules, custom roster, no default absences. Handy for small scenarios.
    pub fn with_roster(codes: &[&str]) -> Self {
        Self {
            employees: codes.iter().map(|c| c.to_string()).collect(),
            default_unavailable: BTreeMap::new(),
            ..Self::default_test()
        }
    }
}

fn invalid(reason: String) -> RosterError {
    RosterError::InvalidConfig { reason }
}
