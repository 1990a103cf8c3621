//! Allocation API endpoints.
//!
//! Stateless JSON counterpart of the dashboard: post a roster CSV, get both
//! output tables back.

use advis_allocation::{FacultyLoad, Metrics, RankIssue, SummaryRow};
use advis_id::{RequestId, UploadId};
use axum::{
    body::Bytes,
    extract::rejection::BytesRejection,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::api::error::ApiError;
use crate::audit::UploadAudit;
use crate::pipeline;
use crate::state::AppState;

/// Create allocation routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/", post(create_allocation))
}

// =============================================================================
// Request/Response Types
// =============================================================================

/// One allocated student.
#[derive(Debug, Serialize, Deserialize)]
pub struct AllocationItem {
    pub roll: String,
    pub name: String,
    pub email: String,
    pub cgpa: f64,
    pub assigned_faculty: String,
}

/// Response for a completed allocation.
#[derive(Debug, Serialize)]
pub struct AllocationResponse {
    /// Correlates this response with the service log.
    pub upload_id: UploadId,

    pub metrics: Metrics,

    /// Students in allocation order (CGPA descending).
    pub allocations: Vec<AllocationItem>,

    /// `(faculty, rank, count)` rows.
    pub summary: Vec<SummaryRow>,

    /// Students per faculty, in column order.
    pub assignment_counts: Vec<FacultyLoad>,

    /// Preference cells that were ignored.
    pub rank_issues: Vec<RankIssue>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Allocate a roster posted as raw CSV.
///
/// POST /v1/allocations
async fn create_allocation(
    body: Result<Bytes, BytesRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let request_id = RequestId::new();
    let body = body.map_err(|rejection| {
        warn!(
            request_id = %request_id,
            status = %rejection.status(),
            error = %rejection.body_text(),
            "Allocation request rejected"
        );
        let err = if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::payload_too_large("payload_too_large", rejection.body_text())
        } else {
            ApiError::bad_request("invalid_body", rejection.body_text())
        };
        err.with_request_id(request_id.to_string())
    })?;
    let upload_id = UploadId::new();
    let audit = UploadAudit::begin(upload_id, "api", body.len());

    let roster = pipeline::ingest(&body, &audit)
        .map_err(|e| ApiError::from(e).with_request_id(request_id.to_string()))?;
    let report = pipeline::run(&roster, &audit)
        .map_err(|e| ApiError::from(e).with_request_id(request_id.to_string()))?;

    let allocations = report
        .allocations
        .iter()
        .map(|r| AllocationItem {
            roll: r.student.roll.clone(),
            name: r.student.name.clone(),
            email: r.student.email.clone(),
            cgpa: r.student.cgpa,
            assigned_faculty: r.faculty.to_string(),
        })
        .collect();

    let response = AllocationResponse {
        upload_id,
        allocations,
        summary: report.summary.rows().collect(),
        assignment_counts: report.loads,
        metrics: report.metrics,
        rank_issues: roster.rank_issues().to_vec(),
    };

    Ok((StatusCode::OK, Json(response)))
}
