//! Error handling and display for the CLI.

use advis_allocation::{ExportError, RosterError, REQUIRED_COLUMNS};
use colored::Colorize;
use thiserror::Error;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{path}: {source}")]
    Roster {
        path: String,
        #[source]
        source: RosterError,
    },

    #[error("could not write {path}: {source}")]
    Export {
        path: String,
        #[source]
        source: ExportError,
    },
}

/// Print an error in a user-friendly format.
pub fn print_error(err: &anyhow::Error) {
    eprintln!("{} {}", "Error:".red().bold(), err);

    let Some(CliError::Roster { source, .. }) = err.downcast_ref::<CliError>() else {
        return;
    };

    let hint = match source {
        RosterError::MissingColumn { .. } | RosterError::NoFacultyColumns => Some(format!(
            "Expected columns: {}, followed by one column per faculty.",
            REQUIRED_COLUMNS.join(", ")
        )),
        RosterError::InvalidCgpa { .. } => {
            Some("CGPA must be a number between 0 and 10 on every row.".to_string())
        }
        RosterError::DuplicateRoll { .. } => {
            Some("Each roll number may appear only once.".to_string())
        }
        _ => None,
    };

    if let Some(hint) = hint {
        eprintln!("\n{}", format!("Hint: {hint}").yellow());
    }
}
