//! Allocation command.

use std::path::PathBuf;

use advis_allocation::export::{allocations_to_csv, summary_to_csv};
use advis_allocation::{
    AllocationRecord, AllocationReport, ExportError, FacultyLoad, Metrics, RankIssue, SummaryRow,
};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::Tabled;

use crate::error::CliError;
use crate::output::{
    print_info, print_json, print_rank_issues, print_success, render_table, OutputFormat,
};

use super::summary::render_summary;
use super::{load_roster, write_tables, CommandContext};

#[derive(Debug, Args)]
pub struct AllocateCommand {
    /// Roster CSV file.
    file: PathBuf,

    /// Write the allocation table (`student_allocation.csv` layout) here.
    #[arg(long)]
    allocation_out: Option<PathBuf>,

    /// Write the preference summary (`faculty_preferences.csv` layout) here.
    #[arg(long)]
    summary_out: Option<PathBuf>,
}

#[derive(Tabled)]
struct AllocationTableRow {
    #[tabled(rename = "Roll")]
    roll: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "CGPA")]
    cgpa: String,
    #[tabled(rename = "Assigned Faculty")]
    faculty: String,
}

impl From<&AllocationRecord> for AllocationTableRow {
    fn from(record: &AllocationRecord) -> Self {
        Self {
            roll: record.student.roll.clone(),
            name: record.student.name.clone(),
            email: record.student.email.clone(),
            cgpa: format!("{:.2}", record.student.cgpa),
            faculty: record.faculty.to_string(),
        }
    }
}

#[derive(Tabled)]
struct LoadTableRow {
    #[tabled(rename = "Faculty")]
    faculty: String,
    #[tabled(rename = "Students")]
    assigned: usize,
}

#[derive(Serialize)]
struct AllocationOutput<'a> {
    metrics: &'a Metrics,
    allocations: Vec<AllocationJson<'a>>,
    summary: Vec<SummaryRow>,
    assignment_counts: &'a [FacultyLoad],
    rank_issues: &'a [RankIssue],
}

#[derive(Serialize)]
struct AllocationJson<'a> {
    roll: &'a str,
    name: &'a str,
    email: &'a str,
    cgpa: f64,
    assigned_faculty: &'a str,
}

impl AllocateCommand {
    pub fn run(self, ctx: &CommandContext) -> Result<()> {
        let roster = load_roster(&self.file)?;
        let report = AllocationReport::build(&roster).map_err(|source| CliError::Roster {
            path: self.file.display().to_string(),
            source,
        })?;

        self.export(&report)?;

        match ctx.format {
            OutputFormat::Table => {
                print_rank_issues(roster.rank_issues());
                print_report(&report);
            }
            OutputFormat::Json => print_json(&AllocationOutput {
                metrics: &report.metrics,
                allocations: report
                    .allocations
                    .iter()
                    .map(|r| AllocationJson {
                        roll: &r.student.roll,
                        name: &r.student.name,
                        email: &r.student.email,
                        cgpa: r.student.cgpa,
                        assigned_faculty: r.faculty.as_str(),
                    })
                    .collect(),
                summary: report.summary.rows().collect(),
                assignment_counts: &report.loads,
                rank_issues: roster.rank_issues(),
            }),
        }

        if ctx.format == OutputFormat::Table {
            if let Some(path) = &self.allocation_out {
                print_success(&format!("Allocation written to {}", path.display()));
            }
            if let Some(path) = &self.summary_out {
                print_success(&format!("Preference summary written to {}", path.display()));
            }
        }

        Ok(())
    }

    /// Writes the requested tables; either all of them land on disk or none.
    fn export(&self, report: &AllocationReport) -> Result<()> {
        let tag = |path: &PathBuf| {
            let path = path.display().to_string();
            move |source: ExportError| CliError::Export { path, source }
        };

        let mut tables = Vec::new();
        if let Some(path) = &self.allocation_out {
            tables.push((
                path.as_path(),
                allocations_to_csv(&report.allocations).map_err(tag(path))?,
            ));
        }
        if let Some(path) = &self.summary_out {
            tables.push((path.as_path(), summary_to_csv(&report.summary).map_err(tag(path))?));
        }
        write_tables(&tables)
    }
}

fn print_report(report: &AllocationReport) {
    let rows: Vec<AllocationTableRow> = report.allocations.iter().map(Into::into).collect();
    println!("{}", "Allocation".bold());
    println!("{}", render_table(&rows));

    println!("\n{}", "Preference summary".bold());
    println!("{}", render_summary(&report.summary));

    let loads: Vec<LoadTableRow> = report
        .loads
        .iter()
        .map(|l| LoadTableRow {
            faculty: l.faculty.to_string(),
            assigned: l.assigned,
        })
        .collect();
    println!("\n{}", "Students per faculty".bold());
    println!("{}", render_table(&loads));

    println!();
    print_info(&format!(
        "{} students, {} faculties, average CGPA {:.2}, {} got their first choice",
        report.metrics.student_count,
        report.metrics.faculty_count,
        report.metrics.mean_cgpa,
        report.first_choice_hits()
    ));
}
