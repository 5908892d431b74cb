//! SQLite-backed comic catalog implementation.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use super::{
    CatalogError, CatalogIssue, CatalogSeries, ComicCatalog, IssueStatus, ReadingListEntry,
    RescanRequest, TrackingLogEntry,
};
use crate::issue::{issue_order_key, IssueKind, OrderKey};

/// Separator used to store alternate series names in one column.
const ALTERNATE_NAME_SEPARATOR: &str = "##";

/// SQLite-backed comic catalog.
pub struct SqliteCatalog {
    conn: Mutex<Connection>,
}

fn db(e: rusqlite::Error) -> CatalogError {
    CatalogError::Database(e.to_string())
}

fn issue_table(kind: IssueKind) -> &'static str {
    match kind {
        IssueKind::Regular => "issues",
        IssueKind::Annual => "annuals",
    }
}

fn parse_timestamp(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

fn parse_status(s: &str) -> IssueStatus {
    IssueStatus::parse(s).unwrap_or_default()
}

impl SqliteCatalog {
    /// Create a new SQLite catalog, creating the database file and tables if needed.
    pub fn new(path: &Path) -> Result<Self, CatalogError> {
        let conn = Connection::open(path).map_err(db)?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory SQLite catalog (useful for testing).
    pub fn in_memory() -> Result<Self, CatalogError> {
        let conn = Connection::open_in_memory().map_err(db)?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, CatalogError> {
        self.conn
            .lock()
            .map_err(|_| CatalogError::Internal("catalog connection lock poisoned".to_string()))
    }

    fn initialize_schema(conn: &Connection) -> Result<(), CatalogError> {
        let issue_columns = r#"
                id TEXT PRIMARY KEY,
                series_id TEXT NOT NULL,
                issue_number TEXT NOT NULL,
                key_whole INTEGER,
                key_fraction INTEGER,
                key_suffix TEXT NOT NULL DEFAULT '',
                release_date TEXT,
                status TEXT NOT NULL
        "#;

        conn.execute_batch(&format!(
            r#"
            -- Followed series
            CREATE TABLE IF NOT EXISTS series (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                alternate_names TEXT NOT NULL DEFAULT '',
                start_year INTEGER,
                publisher TEXT NOT NULL,
                location TEXT NOT NULL,
                version TEXT,
                total_issues INTEGER NOT NULL DEFAULT 0
            );

            -- Regular issues and annuals share a shape but not a table
            CREATE TABLE IF NOT EXISTS issues ({issue_columns});
            CREATE INDEX IF NOT EXISTS idx_issues_key
                ON issues(series_id, key_whole, key_fraction, key_suffix);

            CREATE TABLE IF NOT EXISTS annuals ({issue_columns});
            CREATE INDEX IF NOT EXISTS idx_annuals_key
                ON annuals(series_id, key_whole, key_fraction, key_suffix);

            -- Download name -> issue, consumed on successful post-processing
            CREATE TABLE IF NOT EXISTS tracking_log (
                download_name TEXT PRIMARY KEY,
                issue_id TEXT NOT NULL,
                story_arc TEXT,
                created_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_tracking_log_issue ON tracking_log(issue_id);

            -- Story arc reading lists
            CREATE TABLE IF NOT EXISTS reading_list (
                issue_arc_id TEXT PRIMARY KEY,
                arc_id TEXT NOT NULL,
                arc_name TEXT NOT NULL,
                reading_order INTEGER NOT NULL,
                status TEXT NOT NULL,
                location TEXT
            );

            -- Series waiting for a file rescan
            CREATE TABLE IF NOT EXISTS rescan_requests (
                series_id TEXT PRIMARY KEY,
                requested_at TEXT NOT NULL
            );
            "#
        ))
        .map_err(db)?;

        Ok(())
    }

    fn row_to_series(row: &rusqlite::Row) -> rusqlite::Result<CatalogSeries> {
        let alternates: String = row.get(2)?;
        let location: String = row.get(5)?;
        Ok(CatalogSeries {
            id: row.get(0)?,
            name: row.get(1)?,
            alternate_names: alternates
                .split(ALTERNATE_NAME_SEPARATOR)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            start_year: row.get(3)?,
            publisher: row.get(4)?,
            location: PathBuf::from(location),
            version: row.get(6)?,
            total_issues: row.get(7)?,
        })
    }

    fn row_to_issue(row: &rusqlite::Row, kind: IssueKind) -> rusqlite::Result<CatalogIssue> {
        let status: String = row.get(4)?;
        Ok(CatalogIssue {
            id: row.get(0)?,
            series_id: row.get(1)?,
            issue_number: row.get(2)?,
            release_date: row.get(3)?,
            status: parse_status(&status),
            kind,
        })
    }

    fn row_to_tracking_entry(row: &rusqlite::Row) -> rusqlite::Result<TrackingLogEntry> {
        let created_at: String = row.get(3)?;
        Ok(TrackingLogEntry {
            download_name: row.get(0)?,
            issue_id: row.get(1)?,
            story_arc: row.get(2)?,
            created_at: parse_timestamp(&created_at),
        })
    }

    fn row_to_reading_list_entry(row: &rusqlite::Row) -> rusqlite::Result<ReadingListEntry> {
        let status: String = row.get(4)?;
        let location: Option<String> = row.get(5)?;
        Ok(ReadingListEntry {
            issue_arc_id: row.get(0)?,
            arc_id: row.get(1)?,
            arc_name: row.get(2)?,
            reading_order: row.get(3)?,
            status: parse_status(&status),
            location: location.map(PathBuf::from),
        })
    }
}

impl ComicCatalog for SqliteCatalog {
    fn list_series(&self) -> Result<Vec<CatalogSeries>, CatalogError> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(
                "SELECT id, name, alternate_names, start_year, publisher, location, version, total_issues
                 FROM series ORDER BY name",
            )
            .map_err(db)?;

        let rows = stmt.query_map([], Self::row_to_series).map_err(db)?;

        let mut series = Vec::new();
        for row in rows {
            series.push(row.map_err(db)?);
        }
        Ok(series)
    }

    fn get_series(&self, series_id: &str) -> Result<Option<CatalogSeries>, CatalogError> {
        let conn = self.conn()?;
        conn.query_row(
            "SELECT id, name, alternate_names, start_year, publisher, location, version, total_issues
             FROM series WHERE id = ?",
            params![series_id],
            Self::row_to_series,
        )
        .optional()
        .map_err(db)
    }

    fn upsert_series(&self, series: &CatalogSeries) -> Result<(), CatalogError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO series (id, name, alternate_names, start_year, publisher, location, version, total_issues)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                alternate_names = excluded.alternate_names,
                start_year = excluded.start_year,
                publisher = excluded.publisher,
                location = excluded.location,
                version = excluded.version,
                total_issues = excluded.total_issues",
            params![
                &series.id,
                &series.name,
                series.alternate_names.join(ALTERNATE_NAME_SEPARATOR),
                series.start_year,
                &series.publisher,
                series.location.to_string_lossy(),
                &series.version,
                series.total_issues,
            ],
        )
        .map_err(db)?;
        Ok(())
    }

    fn get_issue(
        &self,
        issue_id: &str,
        kind: IssueKind,
    ) -> Result<Option<CatalogIssue>, CatalogError> {
        let conn = self.conn()?;
        let sql = format!(
            "SELECT id, series_id, issue_number, release_date, status FROM {} WHERE id = ?",
            issue_table(kind)
        );
        conn.query_row(&sql, params![issue_id], |row| Self::row_to_issue(row, kind))
            .optional()
            .map_err(db)
    }

    fn find_issue_by_key(
        &self,
        series_id: &str,
        kind: IssueKind,
        key: &OrderKey,
    ) -> Result<Option<CatalogIssue>, CatalogError> {
        let conn = self.conn()?;
        let sql = format!(
            "SELECT id, series_id, issue_number, release_date, status FROM {}
             WHERE series_id = ? AND key_whole = ? AND key_fraction = ? AND key_suffix = ?
             ORDER BY id LIMIT 1",
            issue_table(kind)
        );
        let suffix = key.suffix.map(|s| s.as_str()).unwrap_or("");
        conn.query_row(
            &sql,
            params![series_id, key.whole, key.fraction, suffix],
            |row| Self::row_to_issue(row, kind),
        )
        .optional()
        .map_err(db)
    }

    fn upsert_issue(&self, issue: &CatalogIssue) -> Result<(), CatalogError> {
        let conn = self.conn()?;
        let key = issue_order_key(&issue.issue_number);
        let sql = format!(
            "INSERT INTO {} (id, series_id, issue_number, key_whole, key_fraction, key_suffix, release_date, status)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                series_id = excluded.series_id,
                issue_number = excluded.issue_number,
                key_whole = excluded.key_whole,
                key_fraction = excluded.key_fraction,
                key_suffix = excluded.key_suffix,
                release_date = excluded.release_date,
                status = excluded.status",
            issue_table(issue.kind)
        );
        conn.execute(
            &sql,
            params![
                &issue.id,
                &issue.series_id,
                &issue.issue_number,
                key.map(|k| k.whole),
                key.map(|k| k.fraction),
                key.and_then(|k| k.suffix).map(|s| s.as_str()).unwrap_or(""),
                &issue.release_date,
                issue.status.as_str(),
            ],
        )
        .map_err(db)?;
        Ok(())
    }

    fn set_issue_status(
        &self,
        issue_id: &str,
        kind: IssueKind,
        status: IssueStatus,
    ) -> Result<(), CatalogError> {
        let conn = self.conn()?;
        let sql = format!("UPDATE {} SET status = ? WHERE id = ?", issue_table(kind));
        let updated = conn
            .execute(&sql, params![status.as_str(), issue_id])
            .map_err(db)?;
        if updated == 0 {
            return Err(CatalogError::NotFound(format!(
                "{} issue {}",
                kind.as_str(),
                issue_id
            )));
        }
        Ok(())
    }

    fn find_tracking_entry(
        &self,
        download_name: &str,
    ) -> Result<Option<TrackingLogEntry>, CatalogError> {
        let conn = self.conn()?;
        conn.query_row(
            "SELECT download_name, issue_id, story_arc, created_at
             FROM tracking_log WHERE download_name = ?",
            params![download_name],
            Self::row_to_tracking_entry,
        )
        .optional()
        .map_err(db)
    }

    fn upsert_tracking_entry(&self, entry: &TrackingLogEntry) -> Result<(), CatalogError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO tracking_log (download_name, issue_id, story_arc, created_at)
             VALUES (?, ?, ?, ?)
             ON CONFLICT(download_name) DO UPDATE SET
                issue_id = excluded.issue_id,
                story_arc = excluded.story_arc,
                created_at = excluded.created_at",
            params![
                &entry.download_name,
                &entry.issue_id,
                &entry.story_arc,
                entry.created_at.to_rfc3339(),
            ],
        )
        .map_err(db)?;
        Ok(())
    }

    fn remove_tracking_entry(&self, download_name: &str) -> Result<bool, CatalogError> {
        let conn = self.conn()?;
        let removed = conn
            .execute(
                "DELETE FROM tracking_log WHERE download_name = ?",
                params![download_name],
            )
            .map_err(db)?;
        Ok(removed > 0)
    }

    fn remove_tracking_entries_for_issue(&self, issue_id: &str) -> Result<usize, CatalogError> {
        let conn = self.conn()?;
        conn.execute(
            "DELETE FROM tracking_log WHERE issue_id = ?",
            params![issue_id],
        )
        .map_err(db)
    }

    fn get_reading_list_entry(
        &self,
        issue_arc_id: &str,
    ) -> Result<Option<ReadingListEntry>, CatalogError> {
        let conn = self.conn()?;
        conn.query_row(
            "SELECT issue_arc_id, arc_id, arc_name, reading_order, status, location
             FROM reading_list WHERE issue_arc_id = ?",
            params![issue_arc_id],
            Self::row_to_reading_list_entry,
        )
        .optional()
        .map_err(db)
    }

    fn upsert_reading_list_entry(&self, entry: &ReadingListEntry) -> Result<(), CatalogError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO reading_list (issue_arc_id, arc_id, arc_name, reading_order, status, location)
             VALUES (?, ?, ?, ?, ?, ?)
             ON CONFLICT(issue_arc_id) DO UPDATE SET
                arc_id = excluded.arc_id,
                arc_name = excluded.arc_name,
                reading_order = excluded.reading_order,
                status = excluded.status,
                location = excluded.location",
            params![
                &entry.issue_arc_id,
                &entry.arc_id,
                &entry.arc_name,
                entry.reading_order,
                entry.status.as_str(),
                entry.location.as_ref().map(|p| p.to_string_lossy().to_string()),
            ],
        )
        .map_err(db)?;
        Ok(())
    }

    fn request_rescan(&self, series_id: &str) -> Result<(), CatalogError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO rescan_requests (series_id, requested_at) VALUES (?, ?)
             ON CONFLICT(series_id) DO UPDATE SET requested_at = excluded.requested_at",
            params![series_id, Utc::now().to_rfc3339()],
        )
        .map_err(db)?;
        Ok(())
    }

    fn pending_rescans(&self) -> Result<Vec<RescanRequest>, CatalogError> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare("SELECT series_id, requested_at FROM rescan_requests ORDER BY requested_at")
            .map_err(db)?;

        let rows = stmt
            .query_map([], |row| {
                let requested_at: String = row.get(1)?;
                Ok(RescanRequest {
                    series_id: row.get(0)?,
                    requested_at: parse_timestamp(&requested_at),
                })
            })
            .map_err(db)?;

        let mut requests = Vec::new();
        for row in rows {
            requests.push(row.map_err(db)?);
        }
        Ok(requests)
    }
}
