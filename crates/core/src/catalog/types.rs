//! Types for the comic catalog.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

use crate::issue::IssueKind;

/// A followed series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSeries {
    /// Series ID.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Alternate names that files may use instead of `name`.
    #[serde(default)]
    pub alternate_names: Vec<String>,
    /// First publication year.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_year: Option<u16>,
    /// Publisher name.
    pub publisher: String,
    /// Directory that holds this series' files.
    pub location: PathBuf,
    /// Version tag (e.g. "v2"), if the series has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Expected number of issues.
    pub total_issues: u32,
}

impl CatalogSeries {
    /// All names a file could be filed under, primary name first.
    pub fn search_names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(
            self.alternate_names
                .iter()
                .map(String::as_str)
                .filter(|n| !n.trim().is_empty()),
        )
    }
}

/// Tracking status of an issue or reading-list entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum IssueStatus {
    #[default]
    Wanted,
    Snatched,
    Downloaded,
    Skipped,
    Archived,
}

impl IssueStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            IssueStatus::Wanted => "Wanted",
            IssueStatus::Snatched => "Snatched",
            IssueStatus::Downloaded => "Downloaded",
            IssueStatus::Skipped => "Skipped",
            IssueStatus::Archived => "Archived",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Wanted" => Some(IssueStatus::Wanted),
            "Snatched" => Some(IssueStatus::Snatched),
            "Downloaded" => Some(IssueStatus::Downloaded),
            "Skipped" => Some(IssueStatus::Skipped),
            "Archived" => Some(IssueStatus::Archived),
            _ => None,
        }
    }
}

/// A single issue (regular or annual).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogIssue {
    /// Issue ID.
    pub id: String,
    /// Owning series ID.
    pub series_id: String,
    /// Raw issue number as listed by the catalog source.
    pub issue_number: String,
    /// Release date, `YYYY-MM-DD` (may be partially zeroed).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    /// Tracking status.
    pub status: IssueStatus,
    /// Which table the issue lives in.
    #[serde(default)]
    pub kind: IssueKind,
}

impl CatalogIssue {
    /// Four-digit release year, if the date carries one.
    pub fn release_year(&self) -> Option<&str> {
        let year = self.release_date.as_deref()?.get(..4)?;
        if year.bytes().all(|b| b.is_ascii_digit()) && year != "0000" {
            Some(year)
        } else {
            None
        }
    }
}

/// Links a download job name to the issue it was grabbed for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingLogEntry {
    /// Normalized download name (primary key).
    pub download_name: String,
    /// Issue ID, possibly carrying a story-arc or multi-volume marker.
    pub issue_id: String,
    /// Story arc name for arc downloads.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub story_arc: Option<String>,
    /// When the entry was written.
    pub created_at: DateTime<Utc>,
}

/// One issue within a story-arc reading list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadingListEntry {
    /// Story arc ID.
    pub arc_id: String,
    /// Issue-within-arc ID (primary key).
    pub issue_arc_id: String,
    /// Story arc name.
    pub arc_name: String,
    /// Position within the arc, starting at 1.
    pub reading_order: u32,
    /// Tracking status.
    pub status: IssueStatus,
    /// Where the file ended up, once downloaded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<PathBuf>,
}

/// A series waiting for its files to be rescanned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RescanRequest {
    pub series_id: String,
    pub requested_at: DateTime<Utc>,
}

/// Errors for catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(release_date: Option<&str>) -> CatalogIssue {
        CatalogIssue {
            id: "1".to_string(),
            series_id: "10".to_string(),
            issue_number: "1".to_string(),
            release_date: release_date.map(str::to_string),
            status: IssueStatus::Wanted,
            kind: IssueKind::Regular,
        }
    }

    #[test]
    fn test_release_year() {
        assert_eq!(issue(Some("2020-03-01")).release_year(), Some("2020"));
        assert_eq!(issue(Some("0000-00-00")).release_year(), None);
        assert_eq!(issue(Some("20")).release_year(), None);
        assert_eq!(issue(None).release_year(), None);
    }

    #[test]
    fn test_status_roundtrip_names() {
        for status in [
            IssueStatus::Wanted,
            IssueStatus::Snatched,
            IssueStatus::Downloaded,
            IssueStatus::Skipped,
            IssueStatus::Archived,
        ] {
            assert_eq!(IssueStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(IssueStatus::parse("downloaded"), None);
    }

    #[test]
    fn test_search_names_skip_blank_alternates() {
        let series = CatalogSeries {
            id: "10".to_string(),
            name: "Saga".to_string(),
            alternate_names: vec!["".to_string(), "Saga (2012)".to_string()],
            start_year: Some(2012),
            publisher: "Image".to_string(),
            location: PathBuf::from("/comics/Saga"),
            version: None,
            total_issues: 60,
        };
        let names: Vec<_> = series.search_names().collect();
        assert_eq!(names, vec!["Saga", "Saga (2012)"]);
    }
}
