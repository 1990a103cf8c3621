//! Roster validation command.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use crate::output::{print_json, print_rank_issues, print_success, OutputFormat};

use super::{load_roster, CommandContext};

#[derive(Debug, Args)]
pub struct ValidateCommand {
    /// Roster CSV file.
    file: PathBuf,
}

#[derive(Debug, Serialize)]
struct ValidationReport<'a> {
    file: String,
    students: usize,
    faculties: Vec<&'a str>,
    rank_issues: &'a [advis_allocation::RankIssue],
}

impl ValidateCommand {
    pub fn run(self, ctx: &CommandContext) -> Result<()> {
        let roster = load_roster(&self.file)?;

        match ctx.format {
            OutputFormat::Table => {
                print_rank_issues(roster.rank_issues());
                print_success(&format!(
                    "{} is valid: {} students, {} faculties ({})",
                    self.file.display(),
                    roster.len(),
                    roster.faculties().len(),
                    roster
                        .faculties()
                        .iter()
                        .map(|f| f.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                ));
            }
            OutputFormat::Json => print_json(&ValidationReport {
                file: self.file.display().to_string(),
                students: roster.len(),
                faculties: roster.faculties().iter().map(|f| f.as_str()).collect(),
                rank_issues: roster.rank_issues(),
            }),
        }

        Ok(())
    }
}
