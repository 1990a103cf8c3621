//! Error types for roster validation and table export.

use thiserror::Error;

/// Reasons a roster is rejected.
///
/// Every variant rejects the whole upload; no allocation or summary is
/// produced from a partially valid file.
#[derive(Debug, Error)]
pub enum RosterError {
    /// A required column is absent from the header row.
    #[error("missing required column '{column}'")]
    MissingColumn { column: &'static str },

    /// The header has no columns besides the required ones.
    #[error("no faculty preference columns found")]
    NoFacultyColumns,

    /// The file has a header but no data rows (or no header at all).
    #[error("roster has no student rows")]
    EmptyInput,

    /// CGPA is not a number in the accepted range.
    #[error("invalid CGPA '{value}' on row {row}: expected a number between 0 and 10")]
    InvalidCgpa { row: usize, value: String },

    /// The same roll number appears on two rows.
    #[error("duplicate roll '{roll}' on row {row} (first seen on row {first_row})")]
    DuplicateRoll {
        roll: String,
        first_row: usize,
        row: usize,
    },

    /// A required cell is blank.
    #[error("row {row} has no value for '{column}'")]
    MissingValue { row: usize, column: &'static str },

    /// A header cell is blank.
    #[error("column {position} has a blank header")]
    BlankHeader { position: usize },

    /// Two header cells share the same name.
    #[error("column '{column}' appears more than once")]
    DuplicateColumn { column: String },

    /// The input is not well-formed CSV (ragged rows, invalid UTF-8, I/O).
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
}

impl RosterError {
    /// Stable machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            RosterError::MissingColumn { .. } => "missing_column",
            RosterError::NoFacultyColumns => "no_faculty_columns",
            RosterError::EmptyInput => "empty_input",
            RosterError::InvalidCgpa { .. } => "invalid_cgpa",
            RosterError::DuplicateRoll { .. } => "duplicate_roll",
            RosterError::MissingValue { .. } => "missing_value",
            RosterError::BlankHeader { .. } => "blank_header",
            RosterError::DuplicateColumn { .. } => "duplicate_column",
            RosterError::Csv(_) => "malformed_csv",
        }
    }

    /// The 1-based data row the error points at, if any.
    pub fn row(&self) -> Option<usize> {
        match self {
            RosterError::InvalidCgpa { row, .. }
            | RosterError::DuplicateRoll { row, .. }
            | RosterError::MissingValue { row, .. } => Some(*row),
            _ => None,
        }
    }
}

/// Errors writing an output table.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
