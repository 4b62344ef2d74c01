use thiserror::Error;

#[derive(Error, Debug)]
pub enum RosterError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Unknown employee '{code}'")]
    UnknownEmployee { code: String },

    #[error("Invalid work rate for '{code}': {rate} (expected 0..=100)")]
    InvalidWorkRate { code: String, rate: i64 },

    #[error("Unknown day '{name}' (expected Monday..Friday)")]
    UnknownDay { name: String },

    #[error("Invalid ISO week {week} for year {year}")]
    InvalidWeek { year: i32, week: u32 },

    #[error("Invalid cell reference '{cell}'")]
    InvalidCell { cell: String },

    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type RosterResult<T> = Result<T, RosterError>;
