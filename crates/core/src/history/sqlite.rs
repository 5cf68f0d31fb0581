//! SQLite-backed history store.

use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::analysis::{CandidateSpecies, ScatAnalysis};
use crate::scan::ScanReport;
use crate::wiki::{WikiContentUrls, WikiImage, WikiReference, WikiSummary};

use super::{HistoryEntry, HistoryError, HistoryFilter, HistoryStore};

/// SQLite-backed append-only scan history.
pub struct SqliteHistoryStore {
    conn: Mutex<Connection>,
}

impl SqliteHistoryStore {
    /// Open the history database, creating the file and tables if needed.
    pub fn new(path: &Path) -> Result<Self, HistoryError> {
        let conn = Connection::open(path).map_err(|e| HistoryError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory history store (useful for testing).
    pub fn in_memory() -> Result<Self, HistoryError> {
        let conn =
            Connection::open_in_memory().map_err(|e| HistoryError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), HistoryError> {
        conn.execute_batch(
            r#"
            -- One row per completed scan
            CREATE TABLE IF NOT EXISTS scans (
                id TEXT PRIMARY KEY,
                created_at TEXT NOT NULL,
                description TEXT NOT NULL,
                image BLOB
            );

            CREATE INDEX IF NOT EXISTS idx_scans_created ON scans(created_at);

            -- Candidate species per scan, in analysis order
            CREATE TABLE IF NOT EXISTS scan_candidates (
                scan_id TEXT NOT NULL REFERENCES scans(id),
                position INTEGER NOT NULL,
                animal_name TEXT NOT NULL,
                scientific_name TEXT NOT NULL,
                PRIMARY KEY (scan_id, position)
            );

            -- Successfully resolved summaries per scan, in candidate order
            CREATE TABLE IF NOT EXISTS scan_summaries (
                scan_id TEXT NOT NULL REFERENCES scans(id),
                position INTEGER NOT NULL,
                title TEXT NOT NULL,
                extract TEXT NOT NULL,
                thumb_source TEXT NOT NULL,
                thumb_width INTEGER NOT NULL,
                thumb_height INTEGER NOT NULL,
                original_source TEXT NOT NULL,
                original_width INTEGER NOT NULL,
                original_height INTEGER NOT NULL,
                page_url TEXT NOT NULL,
                PRIMARY KEY (scan_id, position)
            );
            "#,
        )
        .map_err(|e| HistoryError::Database(e.to_string()))?;

        Ok(())
    }

    fn load_candidates(
        conn: &Connection,
        scan_id: &str,
    ) -> Result<Vec<CandidateSpecies>, HistoryError> {
        let mut stmt = conn
            .prepare(
                "SELECT animal_name, scientific_name FROM scan_candidates
                 WHERE scan_id = ? ORDER BY position",
            )
            .map_err(|e| HistoryError::Database(e.to_string()))?;

        let rows = stmt
            .query_map(params![scan_id], |row| {
                Ok(CandidateSpecies {
                    animal_name: row.get(0)?,
                    scientific_name: row.get(1)?,
                })
            })
            .map_err(|e| HistoryError::Database(e.to_string()))?;

        let mut candidates = Vec::new();
        for row in rows {
            candidates.push(row.map_err(|e| HistoryError::Database(e.to_string()))?);
        }
        Ok(candidates)
    }

    fn load_summaries(conn: &Connection, scan_id: &str) -> Result<Vec<WikiSummary>, HistoryError> {
        let mut stmt = conn
            .prepare(
                "SELECT title, extract, thumb_source, thumb_width, thumb_height,
                        original_source, original_width, original_height, page_url
                 FROM scan_summaries WHERE scan_id = ? ORDER BY position",
            )
            .map_err(|e| HistoryError::Database(e.to_string()))?;

        let rows = stmt
            .query_map(params![scan_id], |row| {
                Ok(WikiSummary {
                    title: row.get(0)?,
                    extract: row.get(1)?,
                    thumbnail: WikiImage {
                        source: row.get(2)?,
                        width: row.get(3)?,
                        height: row.get(4)?,
                    },
                    original_image: WikiImage {
                        source: row.get(5)?,
                        width: row.get(6)?,
                        height: row.get(7)?,
                    },
                    content_urls: WikiContentUrls {
                        mobile: WikiReference { page: row.get(8)? },
                    },
                })
            })
            .map_err(|e| HistoryError::Database(e.to_string()))?;

        let mut summaries = Vec::new();
        for row in rows {
            summaries.push(row.map_err(|e| HistoryError::Database(e.to_string()))?);
        }
        Ok(summaries)
    }
}

impl HistoryStore for SqliteHistoryStore {
    fn append(&self, report: &ScanReport) -> Result<(), HistoryError> {
        let conn = self.conn.lock().unwrap();
        let scan_id = report.id.to_string();

        conn.execute(
            "INSERT INTO scans (id, created_at, description, image) VALUES (?, ?, ?, ?)",
            params![
                scan_id,
                report.created_at.to_rfc3339(),
                report.analysis.scat_description,
                report.image,
            ],
        )
        .map_err(|e| HistoryError::Database(e.to_string()))?;

        for (position, candidate) in report.analysis.matching_animals.iter().enumerate() {
            conn.execute(
                "INSERT INTO scan_candidates (scan_id, position, animal_name, scientific_name)
                 VALUES (?, ?, ?, ?)",
                params![
                    scan_id,
                    position as i64,
                    candidate.animal_name,
                    candidate.scientific_name,
                ],
            )
            .map_err(|e| HistoryError::Database(e.to_string()))?;
        }

        for (position, summary) in report.summaries.iter().enumerate() {
            conn.execute(
                "INSERT INTO scan_summaries (scan_id, position, title, extract,
                     thumb_source, thumb_width, thumb_height,
                     original_source, original_width, original_height, page_url)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                params![
                    scan_id,
                    position as i64,
                    summary.title,
                    summary.extract,
                    summary.thumbnail.source,
                    summary.thumbnail.width,
                    summary.thumbnail.height,
                    summary.original_image.source,
                    summary.original_image.width,
                    summary.original_image.height,
                    summary.content_urls.mobile.page,
                ],
            )
            .map_err(|e| HistoryError::Database(e.to_string()))?;
        }

        Ok(())
    }

    fn get(&self, id: &Uuid) -> Result<Option<ScanReport>, HistoryError> {
        let conn = self.conn.lock().unwrap();
        let scan_id = id.to_string();

        let row = conn
            .query_row(
                "SELECT created_at, description, image FROM scans WHERE id = ?",
                params![scan_id],
                |row| {
                    let created_at: String = row.get(0)?;
                    let description: String = row.get(1)?;
                    let image: Option<Vec<u8>> = row.get(2)?;
                    Ok((created_at, description, image))
                },
            )
            .map(Some)
            .or_else(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => Ok(None),
                other => Err(HistoryError::Database(other.to_string())),
            })?;

        let Some((created_at, description, image)) = row else {
            return Ok(None);
        };

        let created_at = DateTime::parse_from_rfc3339(&created_at)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now());

        let candidates = Self::load_candidates(&conn, &scan_id)?;
        let summaries = Self::load_summaries(&conn, &scan_id)?;

        Ok(Some(ScanReport {
            id: *id,
            created_at,
            image,
            analysis: ScatAnalysis {
                scat_description: description,
                matching_animals: candidates,
            },
            summaries,
        }))
    }

    fn list(&self, filter: &HistoryFilter) -> Result<Vec<HistoryEntry>, HistoryError> {
        let conn = self.conn.lock().unwrap();

        let mut stmt = conn
            .prepare(
                "SELECT s.id, s.created_at, s.description, s.image IS NOT NULL,
                        (SELECT COUNT(*) FROM scan_candidates c WHERE c.scan_id = s.id),
                        (SELECT COUNT(*) FROM scan_summaries m WHERE m.scan_id = s.id)
                 FROM scans s
                 ORDER BY s.created_at DESC
                 LIMIT ? OFFSET ?",
            )
            .map_err(|e| HistoryError::Database(e.to_string()))?;

        let rows = stmt
            .query_map(params![filter.limit, filter.offset], |row| {
                let id: String = row.get(0)?;
                let created_at: String = row.get(1)?;
                let description: String = row.get(2)?;
                let has_image: bool = row.get(3)?;
                let candidate_count: i64 = row.get(4)?;
                let summary_count: i64 = row.get(5)?;
                Ok((
                    id,
                    created_at,
                    description,
                    has_image,
                    candidate_count,
                    summary_count,
                ))
            })
            .map_err(|e| HistoryError::Database(e.to_string()))?;

        let mut entries = Vec::new();
        for row in rows {
            let (id, created_at, description, has_image, candidate_count, summary_count) =
                row.map_err(|e| HistoryError::Database(e.to_string()))?;

            let id = Uuid::parse_str(&id).map_err(|e| HistoryError::Database(e.to_string()))?;
            let created_at = DateTime::parse_from_rfc3339(&created_at)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|_| Utc::now());

            entries.push(HistoryEntry {
                id,
                created_at,
                description,
                candidate_count: candidate_count as usize,
                summary_count: summary_count as usize,
                has_image,
            });
        }
        Ok(entries)
    }

    fn count(&self) -> Result<i64, HistoryError> {
        let conn = self.conn.lock().unwrap();
        conn.query_row("SELECT COUNT(*) FROM scans", [], |row| row.get(0))
            .map_err(|e| HistoryError::Database(e.to_string()))
    }
}
