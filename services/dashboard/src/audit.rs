//! Per-upload audit logging.
//!
//! Each upload gets its own [`UploadAudit`], which owns a `tracing` span
//! carrying the upload ID and file name. The pipeline takes the audit handle
//! as an argument, so every record about an upload is emitted inside that
//! upload's span.

use advis_allocation::{AllocationReport, Roster, RosterError};
use advis_id::UploadId;
use tracing::{error, info, info_span, warn, Span};

#[derive(Debug, Clone)]
pub struct UploadAudit {
    span: Span,
}

impl UploadAudit {
    /// Opens the audit trail for a new upload.
    pub fn begin(upload_id: UploadId, file_name: &str, bytes: usize) -> Self {
        let audit = Self::resume(upload_id, file_name);
        audit.span.in_scope(|| info!(bytes, "File uploaded"));
        audit
    }

    /// Re-attaches to the audit trail of an earlier upload.
    pub fn resume(upload_id: UploadId, file_name: &str) -> Self {
        let span = info_span!("upload", upload_id = %upload_id, file = %file_name);
        Self { span }
    }

    pub fn accepted(&self, roster: &Roster) {
        let _guard = self.span.enter();
        info!(
            students = roster.len(),
            faculties = roster.faculties().len(),
            "Roster accepted"
        );
        for issue in roster.rank_issues() {
            warn!(
                row = issue.row,
                roll = %issue.roll,
                faculty = %issue.faculty,
                value = %issue.value,
                "Invalid rank ignored"
            );
        }
    }

    pub fn rejected(&self, err: &RosterError) {
        let _guard = self.span.enter();
        error!(code = err.code(), error = %err, "Roster rejected");
    }

    pub fn allocated(&self, report: &AllocationReport) {
        let _guard = self.span.enter();
        info!(
            students = report.metrics.student_count,
            faculties = report.metrics.faculty_count,
            mean_cgpa = report.metrics.mean_cgpa,
            first_choice_hits = report.first_choice_hits(),
            "Allocation completed"
        );
    }

    pub fn exported(&self, table: &'static str) {
        let _guard = self.span.enter();
        info!(table, "Table exported");
    }

    pub fn failed(&self, stage: &'static str, err: &dyn std::fmt::Display) {
        let _guard = self.span.enter();
        error!(stage, error = %err, "Processing error");
    }
}
