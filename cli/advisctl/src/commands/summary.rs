//! Preference summary command.

use std::path::PathBuf;

use advis_allocation::export::summary_to_csv;
use advis_allocation::{summarize, PreferenceSummary};
use anyhow::Result;
use clap::Args;

use crate::error::CliError;
use crate::output::{print_json, print_rank_issues, print_success, render_grid, OutputFormat};

use super::{load_roster, write_tables, CommandContext};

#[derive(Debug, Args)]
pub struct SummaryCommand {
    /// Roster CSV file.
    file: PathBuf,

    /// Also write the `Faculty,Rank,Count` table to this path.
    #[arg(long, short = 'o')]
    out: Option<PathBuf>,
}

impl SummaryCommand {
    pub fn run(self, ctx: &CommandContext) -> Result<()> {
        let roster = load_roster(&self.file)?;
        let summary = summarize(roster.students(), roster.faculties());

        if let Some(path) = &self.out {
            let csv = summary_to_csv(&summary).map_err(|source| CliError::Export {
                path: path.display().to_string(),
                source,
            })?;
            write_tables(&[(path.as_path(), csv)])?;
        }

        match ctx.format {
            OutputFormat::Table => {
                print_rank_issues(roster.rank_issues());
                println!("{}", render_summary(&summary));
            }
            OutputFormat::Json => print_json(&summary),
        }

        if let Some(path) = &self.out {
            if ctx.format == OutputFormat::Table {
                print_success(&format!("Preference summary written to {}", path.display()));
            }
        }

        Ok(())
    }
}

/// Wide view: one row per faculty, one `Pref N` column per rank.
pub fn render_summary(summary: &PreferenceSummary) -> String {
    let pivot = summary.pivot();
    let mut headers = vec!["Faculty".to_string()];
    headers.extend(pivot.ranks.iter().map(|r| format!("Pref {r}")));
    let rows = pivot
        .rows
        .into_iter()
        .map(|(faculty, counts)| {
            let mut row = vec![faculty.to_string()];
            row.extend(counts.into_iter().map(|c| c.to_string()));
            row
        })
        .collect();
    render_grid(headers, rows)
}
