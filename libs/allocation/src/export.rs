//! CSV export of the two output tables.
//!
//! - Allocation table: `Roll,Name,Email,CGPA,AssignedFaculty`, in allocation
//!   (sorted) order.
//! - Preference summary: `Faculty,Rank,Count`, faculty by faculty in column
//!   order, ranks ascending.

use std::io;

use serde::Serialize;

use crate::error::ExportError;
use crate::model::AllocationRecord;
use crate::summary::PreferenceSummary;

/// Suggested download name for the allocation table.
pub const ALLOCATION_FILE_NAME: &str = "student_allocation.csv";

/// Suggested download name for the preference summary.
pub const SUMMARY_FILE_NAME: &str = "faculty_preferences.csv";

#[derive(Serialize)]
struct AllocationRow<'a> {
    #[serde(rename = "Roll")]
    roll: &'a str,
    #[serde(rename = "Name")]
    name: &'a str,
    #[serde(rename = "Email")]
    email: &'a str,
    #[serde(rename = "CGPA")]
    cgpa: f64,
    #[serde(rename = "AssignedFaculty")]
    assigned_faculty: &'a str,
}

#[derive(Serialize)]
struct SummaryCsvRow<'a> {
    #[serde(rename = "Faculty")]
    faculty: &'a str,
    #[serde(rename = "Rank")]
    rank: u32,
    #[serde(rename = "Count")]
    count: usize,
}

/// Writes the allocation table.
pub fn write_allocations_csv<W: io::Write>(
    records: &[AllocationRecord],
    writer: W,
) -> Result<(), ExportError> {
    let mut out = csv::Writer::from_writer(writer);
    if records.is_empty() {
        out.write_record(["Roll", "Name", "Email", "CGPA", "AssignedFaculty"])?;
    }
    for record in records {
        out.serialize(AllocationRow {
            roll: &record.student.roll,
            name: &record.student.name,
            email: &record.student.email,
            cgpa: record.student.cgpa,
            assigned_faculty: record.faculty.as_str(),
        })?;
    }
    out.flush()?;
    Ok(())
}

/// Writes the preference summary table.
pub fn write_summary_csv<W: io::Write>(
    summary: &PreferenceSummary,
    writer: W,
) -> Result<(), ExportError> {
    let mut out = csv::Writer::from_writer(writer);
    let mut wrote_any = false;
    for row in summary.rows() {
        out.serialize(SummaryCsvRow {
            faculty: row.faculty.as_str(),
            rank: row.rank,
            count: row.count,
        })?;
        wrote_any = true;
    }
    if !wrote_any {
        out.write_record(["Faculty", "Rank", "Count"])?;
    }
    out.flush()?;
    Ok(())
}

/// Allocation table as a CSV string.
pub fn allocations_to_csv(records: &[AllocationRecord]) -> Result<String, ExportError> {
    let mut buf = Vec::new();
    write_allocations_csv(records, &mut buf)?;
    String::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e).into())
}

/// Preference summary as a CSV string.
pub fn summary_to_csv(summary: &PreferenceSummary) -> Result<String, ExportError> {
    let mut buf = Vec::new();
    write_summary_csv(summary, &mut buf)?;
    String::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e).into())
}
