//! CLI commands.

mod allocate;
mod summary;
mod validate;

use std::fs;
use std::io::Write;
use std::path::Path;

use advis_allocation::{ExportError, Roster};
use anyhow::Result;
use clap::{Parser, Subcommand};
use tempfile::NamedTempFile;

use crate::error::CliError;
use crate::output::OutputFormat;

/// advisctl - Allocate students to faculty advisors by CGPA, round-robin.
#[derive(Debug, Parser)]
#[command(name = "advisctl")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format.
    #[arg(
        long,
        global = true,
        value_enum,
        default_value_t = OutputFormat::Table,
        env = "ADVIS_FORMAT"
    )]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Allocate every student in a roster and optionally export both tables.
    Allocate(allocate::AllocateCommand),

    /// Show how often each faculty was ranked at each preference.
    Summary(summary::SummaryCommand),

    /// Check a roster without allocating.
    Validate(validate::ValidateCommand),
}

impl Cli {
    /// Run the CLI command.
    pub fn run(self) -> Result<()> {
        let ctx = CommandContext {
            format: self.format,
        };

        match self.command {
            Commands::Allocate(cmd) => cmd.run(&ctx),
            Commands::Summary(cmd) => cmd.run(&ctx),
            Commands::Validate(cmd) => cmd.run(&ctx),
        }
    }
}

/// Shared command context.
pub struct CommandContext {
    pub format: OutputFormat,
}

/// Load and validate a roster, tagging errors with the file path.
pub fn load_roster(path: &Path) -> Result<Roster> {
    Roster::from_path(path).map_err(|source| {
        CliError::Roster {
            path: path.display().to_string(),
            source,
        }
        .into()
    })
}

fn export_error(path: &Path, source: ExportError) -> CliError {
    CliError::Export {
        path: path.display().to_string(),
        source,
    }
}

/// Writes `contents` to a temporary file next to `path`.
fn stage(path: &Path, contents: &str) -> Result<NamedTempFile, CliError> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let mut file = NamedTempFile::new_in(dir).map_err(|e| export_error(path, e.into()))?;
    file.write_all(contents.as_bytes()).map_err(|e| export_error(path, e.into()))?;
    Ok(file)
}

/// Writes every `(path, contents)` table or none of them.
///
/// All tables are staged first; they are moved into place only once every
/// one of them was written. If moving a later table fails, the tables already
/// moved are removed again.
pub fn write_tables(tables: &[(&Path, String)]) -> Result<()> {
    let mut staged = Vec::with_capacity(tables.len());
    for (path, contents) in tables {
        staged.push((*path, stage(path, contents)?));
    }

    let mut written: Vec<&Path> = Vec::with_capacity(staged.len());
    for (path, file) in staged {
        if let Err(err) = file.persist(path) {
            for done in &written {
                let _ = fs::remove_file(done);
            }
            return Err(export_error(path, err.error.into()).into());
        }
        written.push(path);
    }
    Ok(())
}
