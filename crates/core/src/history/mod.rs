//! Scan history persistence.
//!
//! An append-only store of completed scan reports. Reports are immutable
//! after creation: there is no update path and no cascade semantics, only
//! append, point lookup and newest-first listing.

mod sqlite;
mod store;

pub use sqlite::SqliteHistoryStore;
pub use store::{HistoryEntry, HistoryFilter, HistoryStore};

use thiserror::Error;

/// Error type for history operations.
#[derive(Debug, Error)]
pub enum HistoryError {
    /// Database error.
    #[error("database error: {0}")]
    Database(String),
}
