//! Application state shared across request handlers.

use std::collections::BTreeMap;
use std::sync::Arc;

use advis_allocation::{AllocationReport, Roster};
use advis_id::UploadId;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::config::Config;

/// One uploaded roster and, once computed, its allocation report.
#[derive(Debug, Clone)]
pub struct Session {
    pub file_name: String,
    pub uploaded_at: DateTime<Utc>,
    pub roster: Arc<Roster>,
    pub report: Option<Arc<AllocationReport>>,
}

impl Session {
    pub fn new(file_name: impl Into<String>, roster: Roster) -> Self {
        Self {
            file_name: file_name.into(),
            uploaded_at: Utc::now(),
            roster: Arc::new(roster),
            report: None,
        }
    }
}

/// Shared application state.
///
/// This is passed to all request handlers via Axum's state extractor.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    sessions: RwLock<BTreeMap<UploadId, Session>>,
    max_sessions: usize,
    max_upload_bytes: usize,
}

impl AppState {
    /// Create a new application state.
    pub fn new(max_sessions: usize, max_upload_bytes: usize) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                sessions: RwLock::new(BTreeMap::new()),
                max_sessions: max_sessions.max(1),
                max_upload_bytes,
            }),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.max_sessions, config.max_upload_bytes)
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.inner.max_upload_bytes
    }

    /// Stores a session, dropping the oldest ones beyond capacity.
    ///
    /// Upload IDs are ULIDs, so map order is upload order.
    pub async fn insert_session(&self, id: UploadId, session: Session) {
        let mut sessions = self.inner.sessions.write().await;
        sessions.insert(id, session);
        while sessions.len() > self.inner.max_sessions {
            if let Some((evicted, _)) = sessions.pop_first() {
                tracing::debug!(upload_id = %evicted, "Session evicted");
            }
        }
    }

    pub async fn session(&self, id: &UploadId) -> Option<Session> {
        self.inner.sessions.read().await.get(id).cloned()
    }

    /// Caches the report for a session. Returns false if the session is gone.
    pub async fn store_report(&self, id: &UploadId, report: Arc<AllocationReport>) -> bool {
        match self.inner.sessions.write().await.get_mut(id) {
            Some(session) => {
                session.report = Some(report);
                true
            }
            None => false,
        }
    }

    pub async fn session_count(&self) -> usize {
        self.inner.sessions.read().await.len()
    }
}
