//! Error types for meeting-engine operations.

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlannerError {
    #[error("Invalid timezone: {0}")]
    InvalidTimeZone(String),

    #[error("Invalid month: {0} (expected 1-12)")]
    InvalidMonth(u32),

    #[error("Invalid date: {year:04}-{month:02}-{day:02}")]
    InvalidDate { year: i32, month: u32, day: u32 },

    /// The date is valid but a computation around it leaves chrono's range.
    #[error("Date out of supported range: {0}")]
    DateOutOfRange(NaiveDate),

    #[error("Invalid working window: {start_hour}..={end_hour}")]
    InvalidWindow { start_hour: u32, end_hour: u32 },

    #[error("Unknown country group: {0}")]
    UnknownGroup(String),

    /// A holiday source loader failed; the message is passed through unchanged.
    #[error("Failed to load holiday source: {0}")]
    Load(String),
}

pub type Result<T> = std::result::Result<T, PlannerError>;
