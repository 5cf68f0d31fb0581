//! History storage trait and query types.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::scan::ScanReport;

use super::HistoryError;

/// Listing row for one stored scan. Carries no image payload.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    /// The analysis description.
    pub description: String,
    pub candidate_count: usize,
    pub summary_count: usize,
    pub has_image: bool,
}

/// Filter for listing stored scans.
#[derive(Debug, Clone)]
pub struct HistoryFilter {
    /// Maximum number of results.
    pub limit: i64,
    /// Offset for pagination.
    pub offset: i64,
}

impl Default for HistoryFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryFilter {
    pub fn new() -> Self {
        Self {
            limit: 100,
            offset: 0,
        }
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_offset(mut self, offset: i64) -> Self {
        self.offset = offset;
        self
    }
}

/// Trait for history storage backends.
pub trait HistoryStore: Send + Sync {
    /// Append a completed scan report. Reports are never updated afterwards.
    fn append(&self, report: &ScanReport) -> Result<(), HistoryError>;

    /// Get a stored report by id.
    fn get(&self, id: &Uuid) -> Result<Option<ScanReport>, HistoryError>;

    /// List stored scans, newest first.
    fn list(&self, filter: &HistoryFilter) -> Result<Vec<HistoryEntry>, HistoryError>;

    /// Count stored scans.
    fn count(&self) -> Result<i64, HistoryError>;
}
