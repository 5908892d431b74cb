//! Comic catalog - the followed series, their issues and the download
//! bookkeeping the post-processor reads and updates.
//!
//! Lookups are synchronous point/set queries; a single SQLite connection
//! behind a mutex backs the default implementation.

mod sqlite;
mod types;

pub use sqlite::SqliteCatalog;
pub use types::*;

use crate::issue::{IssueKind, OrderKey};

/// Trait for catalog storage.
pub trait ComicCatalog: Send + Sync {
    /// All followed series.
    fn list_series(&self) -> Result<Vec<CatalogSeries>, CatalogError>;

    /// Get a series by ID.
    fn get_series(&self, series_id: &str) -> Result<Option<CatalogSeries>, CatalogError>;

    /// Insert or replace a series.
    fn upsert_series(&self, series: &CatalogSeries) -> Result<(), CatalogError>;

    /// Get an issue by ID from the issues or annuals table.
    fn get_issue(&self, issue_id: &str, kind: IssueKind)
        -> Result<Option<CatalogIssue>, CatalogError>;

    /// Find an issue of a series by its order key.
    fn find_issue_by_key(
        &self,
        series_id: &str,
        kind: IssueKind,
        key: &OrderKey,
    ) -> Result<Option<CatalogIssue>, CatalogError>;

    /// Insert or replace an issue. The order key is derived from
    /// `issue.issue_number`.
    fn upsert_issue(&self, issue: &CatalogIssue) -> Result<(), CatalogError>;

    /// Update the status of an issue.
    ///
    /// Returns `CatalogError::NotFound` if the issue does not exist.
    fn set_issue_status(
        &self,
        issue_id: &str,
        kind: IssueKind,
        status: IssueStatus,
    ) -> Result<(), CatalogError>;

    /// Look up a tracking-log entry by its exact download name.
    fn find_tracking_entry(
        &self,
        download_name: &str,
    ) -> Result<Option<TrackingLogEntry>, CatalogError>;

    /// Insert or replace a tracking-log entry.
    fn upsert_tracking_entry(&self, entry: &TrackingLogEntry) -> Result<(), CatalogError>;

    /// Delete a tracking-log entry. Returns whether a row was removed.
    fn remove_tracking_entry(&self, download_name: &str) -> Result<bool, CatalogError>;

    /// Delete every tracking-log entry pointing at an issue.
    fn remove_tracking_entries_for_issue(&self, issue_id: &str) -> Result<usize, CatalogError>;

    /// Get a reading-list entry by its issue-arc ID.
    fn get_reading_list_entry(
        &self,
        issue_arc_id: &str,
    ) -> Result<Option<ReadingListEntry>, CatalogError>;

    /// Insert or replace a reading-list entry.
    fn upsert_reading_list_entry(&self, entry: &ReadingListEntry) -> Result<(), CatalogError>;

    /// Record that a series needs its files rescanned. Idempotent.
    fn request_rescan(&self, series_id: &str) -> Result<(), CatalogError>;

    /// Series with an outstanding rescan request.
    fn pending_rescans(&self) -> Result<Vec<RescanRequest>, CatalogError>;
}
