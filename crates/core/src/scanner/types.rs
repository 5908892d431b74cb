//! Types for manual reconciliation scans.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::catalog::{CatalogIssue, CatalogSeries};

/// A file that loosely matches a series name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    pub path: PathBuf,
    /// The series name (primary or alternate) that matched.
    pub matched_name: String,
    /// Filename text after the series name, extension included.
    pub remainder: String,
}

/// A file matched to a catalog issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualCandidate {
    pub series: CatalogSeries,
    pub issue: CatalogIssue,
    pub path: PathBuf,
}

/// A matched file that was left alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub series_id: String,
    pub reason: String,
}

/// Outcome of scanning a folder against the catalog.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanReport {
    /// Files matched to an issue, in scan order.
    pub candidates: Vec<ManualCandidate>,
    /// Files that matched some series name, before issue lookup.
    pub files_matched: usize,
    /// Series with no matching file at all.
    pub unmatched_series: usize,
    /// Matched files with no usable issue number.
    pub skipped: Vec<SkippedFile>,
}

impl ScanReport {
    /// One-line summary of the scan.
    pub fn summary(&self) -> String {
        format!(
            "There are {} files found that match on your watchlist, {} do not match anything and will be ignored.",
            self.candidates.len(),
            self.unmatched_series
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_line() {
        let report = ScanReport {
            unmatched_series: 3,
            ..Default::default()
        };
        assert_eq!(
            report.summary(),
            "There are 0 files found that match on your watchlist, 3 do not match anything and will be ignored."
        );
    }
}
