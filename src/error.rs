//! Error types for timetabling runs.
//!
//! Only whole-run rejections are errors. Sessions or exams that cannot
//! be placed are reported inside the result, and resource shortages
//! are reported as [`Diagnostic`](crate::models::Diagnostic) warnings.

use chrono::NaiveDate;
use thiserror::Error;

use crate::validation::ValidationError;

#[derive(Debug, Error)]
pub enum TimetableError {
    #[error("invalid input: {}", summarize(.0))]
    InvalidInput(Vec<ValidationError>),

    #[error("invalid exam date range {start} to {end}: {reason}")]
    InvalidDateRange {
        start: NaiveDate,
        end: NaiveDate,
        reason: String,
    },
}

impl From<Vec<ValidationError>> for TimetableError {
    fn from(errors: Vec<ValidationError>) -> Self {
        TimetableError::InvalidInput(errors)
    }
}

fn summarize(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T> = std::result::Result<T, TimetableError>;
