//! Spreadsheet template layout and rendering.
//!
//! The printed schedule is a fixed grid: one column group per weekday,
//! lab stations on fixed rows, screening/duty/lunch names in row-3 cells.
//! Rendering produces a cell-reference -> text map the caller writes into
//! the workbook; importing reads duty holders back from such a map.

use crate::{
    assignment::{LabLayout, WeekAssignment},
    calendar::Weekday,
    error::{RosterError, RosterResult},
    types::{EmployeeCode, StationId, WeekNumber},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Cell reference ("B4") -> cell text.
pub type CellGrid = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateLayout {
    pub header_cell:          String,
    pub clinical_columns:     BTreeMap<Weekday, String>,
    pub screen_columns:       BTreeMap<Weekday, String>,
    pub duty_columns:         BTreeMap<Weekday, String>,
    pub lunch_guard_columns:  BTreeMap<Weekday, String>,
    /// Row for duty, lunch guard and the morning screener.
    pub duty_row:             u32,
    pub morning_screen_row:   u32,
    pub afternoon_screen_row: u32,
    /// The morning block is printed twice (early and late morning).
    pub morning_lab_rows:     Vec<BTreeMap<StationId, u32>>,
    pub afternoon_lab_rows:   BTreeMap<StationId, u32>,
}

impl Default for TemplateLayout {
    fn default() -> Self {
        let cols = |letters: [&str; 5]| -> BTreeMap<Weekday, String> {
            Weekday::ALL.into_iter().zip(letters.map(String::from)).collect()
        };
        let rows = |first: u32| -> BTreeMap<StationId, u32> {
            ["LAB 3", "LAB 6", "LAB 9", "LAB 10"]
                .into_iter()
                .enumerate()
                .map(|(i, s)| (s.to_string(), first + i as u32))
                .collect()
        };

        Self {
            header_cell: "A1".into(),
            clinical_columns: cols(["B", "F", "J", "N", "R"]),
            screen_columns: cols(["C", "G", "K", "O", "S"]),
            duty_columns: [
                (Weekday::Monday, "D".to_string()),
                (Weekday::Tuesday, "H".to_string()),
                (Weekday::Thursday, "P".to_string()),
            ]
            .into(),
            lunch_guard_columns: [(Weekday::Wednesday, "L".to_string())].into(),
            duty_row: 3,
            morning_screen_row: 3,
            afternoon_screen_row: 14,
            morning_lab_rows: vec![rows(4), rows(9)],
            afternoon_lab_rows: rows(14),
        }
    }
}

impl TemplateLayout {
    pub fn validate(&self) -> RosterResult<()> {
        parse_cell(&self.header_cell)?;
        let columns = self
            .clinical_columns
            .values()
            .chain(self.screen_columns.values())
            .chain(self.duty_columns.values())
            .chain(self.lunch_guard_columns.values());
        for col in columns {
            parse_cell(&format!("{col}1"))?;
        }
        let rows = self
            .morning_lab_rows
            .iter()
            .flat_map(|group| group.values())
            .chain(self.afternoon_lab_rows.values())
            .chain([&self.duty_row, &self.morning_screen_row, &self.afternoon_screen_row]);
        for row in rows {
            if *row == 0 {
                return Err(RosterError::InvalidCell { cell: format!("row {row}") });
            }
        }
        Ok(())
    }

    /// Whether every block has a row for this station.
    pub fn has_station(&self, station: &str) -> bool {
        self.afternoon_lab_rows.contains_key(station)
            && self.morning_lab_rows.iter().all(|g| g.contains_key(station))
    }

    pub fn render(&self, week: WeekNumber, assignment: &WeekAssignment) -> CellGrid {
        let mut grid = CellGrid::new();
        grid.insert(self.header_cell.clone(), format!("v.{week}"));

        for (day, a) in &assignment.days {
            if let Some(col) = self.clinical_columns.get(day) {
                for rows in &self.morning_lab_rows {
                    write_labs(&mut grid, col, rows, &a.morning_lab);
                }
                if let Some(layout) = &a.afternoon_lab {
                    write_labs(&mut grid, col, &self.afternoon_lab_rows, layout);
                }
            }

            if let Some(col) = self.screen_columns.get(day) {
                grid.insert(format!("{col}{}", self.morning_screen_row), a.morning_screen.join("/"));
                if let Some(screen) = &a.afternoon_screen {
                    grid.insert(format!("{col}{}", self.afternoon_screen_row), screen.join("/"));
                }
            }

            if let (Some(holder), Some(col)) = (&a.duty, self.duty_columns.get(day)) {
                grid.insert(format!("{col}{}", self.duty_row), holder.clone());
            }
            if let (Some(guard), Some(col)) = (&a.lunch_guard, self.lunch_guard_columns.get(day)) {
                grid.insert(format!("{col}{}", self.duty_row), guard.clone());
            }
        }
        grid
    }

    /// Read duty holders back out of a filled grid. Unknown names are skipped.
    pub fn extract_duties(&self, grid: &CellGrid, roster: &[EmployeeCode]) -> Vec<(Weekday, EmployeeCode)> {
        self.duty_columns
            .iter()
            .filter_map(|(day, col)| {
                let value = grid.get(&format!("{col}{}", self.duty_row))?.trim();
                roster
                    .iter()
                    .find(|code| code.as_str() == value)
                    .map(|code| (*day, code.clone()))
            })
            .collect()
    }
}

fn write_labs(grid: &mut CellGrid, col: &str, rows: &BTreeMap<StationId, u32>, layout: &LabLayout) {
    for (person, station) in layout {
        match rows.get(station) {
            Some(row) => {
                grid.insert(format!("{col}{row}"), person.clone());
            }
            None => log::warn!("template: no row for station {station}, {person} not written"),
        }
    }
}

/// Split "AB12" into ("AB", 12).
pub fn parse_cell(cell: &str) -> RosterResult<(String, u32)> {
    let invalid = || RosterError::InvalidCell { cell: cell.to_string() };
    let split = cell.find(|c: char| c.is_ascii_digit()).ok_or_else(invalid)?;
    let (col, row) = cell.split_at(split);
    if col.is_empty() || !col.chars().all(|c| c.is_ascii_uppercase()) {
        return Err(invalid());
    }
    let row: u32 = row.parse().map_err(|_| invalid())?;
    if row == 0 {
        return Err(invalid());
    }
    Ok((col.to_string(), row))
}
