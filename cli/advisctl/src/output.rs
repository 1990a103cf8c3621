//! Output formatting for CLI commands.

use advis_allocation::RankIssue;
use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;
use tabled::{builder::Builder, Table, Tabled};

const CLI_SCHEMA_VERSION: &str = "advis.cli.v1";

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table format.
    #[default]
    Table,
    /// JSON format.
    Json,
}

/// Render rows as a table.
pub fn render_table<T: Tabled>(data: &[T]) -> String {
    if data.is_empty() {
        return "No rows.".dimmed().to_string();
    }
    Table::new(data).to_string()
}

/// Render a table whose columns are only known at runtime.
pub fn render_grid(headers: Vec<String>, rows: Vec<Vec<String>>) -> String {
    let mut builder = Builder::default();
    builder.push_record(headers);
    for row in rows {
        builder.push_record(row);
    }
    builder.build().to_string()
}

/// Wrap data in the versioned JSON envelope.
pub fn json_envelope<T: Serialize + ?Sized>(data: &T) -> serde_json::Value {
    serde_json::json!({
        "schemaVersion": CLI_SCHEMA_VERSION,
        "data": serde_json::to_value(data).unwrap_or(serde_json::Value::Null),
    })
}

/// Print data as pretty JSON inside the envelope.
pub fn print_json<T: Serialize + ?Sized>(data: &T) {
    let value = json_envelope(data);
    println!(
        "{}",
        serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
    );
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", "Success:".green().bold(), message);
}

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", "Info:".blue().bold(), message);
}

/// Print ignored preference cells to stderr.
pub fn print_rank_issues(issues: &[RankIssue]) {
    for issue in issues {
        eprintln!(
            "{} row {} (roll {}): '{}' is not a valid rank for {}; ignored",
            "Warning:".yellow().bold(),
            issue.row,
            issue.roll,
            issue.value,
            issue.faculty
        );
    }
}
