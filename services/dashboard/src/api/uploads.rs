//! Dashboard pages: upload, preview, allocate, download.

use std::sync::Arc;

use advis_allocation::export::{
    allocations_to_csv, summary_to_csv, ALLOCATION_FILE_NAME, SUMMARY_FILE_NAME,
};
use advis_allocation::AllocationReport;
use advis_id::UploadId;
use axum::{
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tracing::{error, warn};

use crate::audit::UploadAudit;
use crate::pipeline;
use crate::state::{AppState, Session};
use crate::views;

/// Multipart field carrying the roster file.
const FILE_FIELD: &str = "file";

/// Create dashboard routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/uploads", post(upload))
        .route("/uploads/{upload_id}/allocate", post(allocate))
        .route("/uploads/{upload_id}/allocation.csv", get(download_allocation))
        .route("/uploads/{upload_id}/preferences.csv", get(download_preferences))
}

/// Error rendered as an HTML page with a visible banner.
#[derive(Debug)]
struct PageError {
    status: StatusCode,
    message: String,
}

impl PageError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = %self.status, error = %self.message, "Request failed");
        } else {
            warn!(status = %self.status, error = %self.message, "Request rejected");
        }
        (self.status, Html(views::error_page(&self.message))).into_response()
    }
}

impl From<MultipartError> for PageError {
    fn from(err: MultipartError) -> Self {
        Self::new(err.status(), err.body_text())
    }
}

async fn index() -> Html<String> {
    Html(views::index_page())
}

/// Accept an uploaded CSV and show the data sample.
///
/// POST /uploads
async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Html<String>, PageError> {
    let mut file = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or("upload.csv").to_string();
        let bytes = field.bytes().await?;
        file = Some((file_name, bytes));
        break;
    }

    let Some((file_name, bytes)) = file else {
        return Err(PageError::new(
            StatusCode::BAD_REQUEST,
            "No file was uploaded. Choose a CSV file first.",
        ));
    };

    let upload_id = UploadId::new();
    let audit = UploadAudit::begin(upload_id, &file_name, bytes.len());
    let roster = pipeline::ingest(&bytes, &audit)
        .map_err(|e| PageError::new(StatusCode::BAD_REQUEST, e.to_string()))?;

    let session = Session::new(file_name, roster);
    let page = views::preview_page(upload_id, &session);
    state.insert_session(upload_id, session).await;

    Ok(Html(page))
}

async fn lookup(state: &AppState, raw_id: &str) -> Result<(UploadId, Session), PageError> {
    let upload_id: UploadId = raw_id.parse().map_err(|_| {
        PageError::new(StatusCode::BAD_REQUEST, format!("Invalid upload ID '{raw_id}'"))
    })?;
    let session = state.session(&upload_id).await.ok_or_else(|| {
        PageError::new(
            StatusCode::NOT_FOUND,
            "This upload has expired. Upload the file again.",
        )
    })?;
    Ok((upload_id, session))
}

/// Returns the cached report for a session, computing it on first use.
async fn ensure_report(
    state: &AppState,
    upload_id: UploadId,
    session: &Session,
) -> Result<Arc<AllocationReport>, PageError> {
    if let Some(report) = &session.report {
        return Ok(report.clone());
    }

    let audit = UploadAudit::resume(upload_id, &session.file_name);
    let report = pipeline::run(&session.roster, &audit)
        .map(Arc::new)
        .map_err(|e| PageError::new(StatusCode::BAD_REQUEST, e.to_string()))?;
    state.store_report(&upload_id, report.clone()).await;
    Ok(report)
}

/// Run the allocation and render the results.
///
/// POST /uploads/{upload_id}/allocate
async fn allocate(
    State(state): State<AppState>,
    Path(upload_id): Path<String>,
) -> Result<Html<String>, PageError> {
    let (upload_id, session) = lookup(&state, &upload_id).await?;
    let report = ensure_report(&state, upload_id, &session).await?;
    Ok(Html(views::results_page(upload_id, &session, &report)))
}

fn csv_attachment(file_name: &'static str, body: String) -> Response {
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        body,
    )
        .into_response()
}

/// GET /uploads/{upload_id}/allocation.csv
async fn download_allocation(
    State(state): State<AppState>,
    Path(upload_id): Path<String>,
) -> Result<Response, PageError> {
    let (upload_id, session) = lookup(&state, &upload_id).await?;
    let report = ensure_report(&state, upload_id, &session).await?;
    let audit = UploadAudit::resume(upload_id, &session.file_name);

    let body = allocations_to_csv(&report.allocations).map_err(|e| {
        audit.failed("export_allocation", &e);
        PageError::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;
    audit.exported("allocation");
    Ok(csv_attachment(ALLOCATION_FILE_NAME, body))
}

/// GET /uploads/{upload_id}/preferences.csv
async fn download_preferences(
    State(state): State<AppState>,
    Path(upload_id): Path<String>,
) -> Result<Response, PageError> {
    let (upload_id, session) = lookup(&state, &upload_id).await?;
    let report = ensure_report(&state, upload_id, &session).await?;
    let audit = UploadAudit::resume(upload_id, &session.file_name);

    let body = summary_to_csv(&report.summary).map_err(|e| {
        audit.failed("export_preferences", &e);
        PageError::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;
    audit.exported("preferences");
    Ok(csv_attachment(SUMMARY_FILE_NAME, body))
}
