//! Shared primitive types used across the entire roster engine.

use std::collections::BTreeMap;

/// Short unique employee code (initials), e.g. "AH" or "LAO".
pub type EmployeeCode = String;

/// Identifier of a physical lab station, e.g. "LAB 3".
pub type StationId = String;

/// ISO week number within its ISO year, 1..=53.
pub type WeekNumber = u32;

/// The canonical generation run identifier.
pub type RunId = String;

/// Percent clinical time per employee, 0..=100.
/// BTreeMap so every iteration over it is ordered and reproducible.
pub type WorkRates = BTreeMap<EmployeeCode, u32>;

/// Employee -> cumulative count (duty history, screening history).
pub type CountMap = BTreeMap<EmployeeCode, u32>;
