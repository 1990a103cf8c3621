//! Upload processing: parse, validate, allocate.
//!
//! Both steps are pure apart from the audit records written through the
//! [`UploadAudit`] handle passed in by the caller.

use advis_allocation::{AllocationReport, Roster, RosterError};

use crate::audit::UploadAudit;

/// Parses and validates an uploaded roster.
pub fn ingest(bytes: &[u8], audit: &UploadAudit) -> Result<Roster, RosterError> {
    match Roster::from_csv_bytes(bytes) {
        Ok(roster) => {
            audit.accepted(&roster);
            Ok(roster)
        }
        Err(err) => {
            audit.rejected(&err);
            Err(err)
        }
    }
}

/// Runs the allocation and the preference summary for a validated roster.
pub fn run(roster: &Roster, audit: &UploadAudit) -> Result<AllocationReport, RosterError> {
    match AllocationReport::build(roster) {
        Ok(report) => {
            audit.allocated(&report);
            Ok(report)
        }
        Err(err) => {
            audit.rejected(&err);
            Err(err)
        }
    }
}
