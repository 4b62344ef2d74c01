//! Weekly duty-roster engine.
//!
//! Assigns lab stations, screening/MR, the recurring MDK duty and the
//! lunch guard for a five-day week, fairly and within per-person caps,
//! and renders the result into the unit's spreadsheet template.

pub mod assignment;
pub mod availability;
pub mod calendar;
pub mod capped_selector;
pub mod command;
pub mod config;
pub mod day_planner;
pub mod duty_scorer;
pub mod engine;
pub mod error;
pub mod event;
pub mod ledger;
pub mod rng;
pub mod sampler;
pub mod snapshot;
pub mod store;
pub mod template;
pub mod types;
pub mod week_orchestrator;
