//! Testing utilities and mock implementations.
//!
//! Mocks for every collaborator the post-processor drives, plus fixtures
//! that seed a catalog with series, issues and tracking entries.
//!
//! # Example
//!
//! ```rust,ignore
//! use shortbox_core::testing::{fixtures, MockNotifier, MockTagger};
//!
//! let catalog = Arc::new(SqliteCatalog::in_memory()?);
//! fixtures::seed_watchlist(&catalog, "Saga.005.2012", &series, &issue);
//!
//! let notifier = Arc::new(MockNotifier::new());
//! let processor = PostProcessor::new(&config, catalog, relocator)
//!     .with_tagger(Arc::new(MockTagger::new()))
//!     .with_notifier(notifier.clone());
//! ```

mod mock_notifier;
mod mock_relocator;
mod mock_script_runner;
mod mock_tagger;

pub use mock_notifier::MockNotifier;
pub use mock_relocator::{MockRelocator, RecordedRelocation};
pub use mock_script_runner::MockScriptRunner;
pub use mock_tagger::MockTagger;

/// Test fixtures and helper functions.
pub mod fixtures {
    use chrono::Utc;
    use std::path::{Path, PathBuf};

    use crate::catalog::{
        CatalogIssue, CatalogSeries, ComicCatalog, IssueStatus, ReadingListEntry, TrackingLogEntry,
    };
    use crate::issue::IssueKind;

    /// Create a test series stored under `library_root/<name> (<year>)`.
    pub fn series(id: &str, name: &str, start_year: u16, library_root: &Path) -> CatalogSeries {
        CatalogSeries {
            id: id.to_string(),
            name: name.to_string(),
            alternate_names: Vec::new(),
            start_year: Some(start_year),
            publisher: "Image".to_string(),
            location: library_root.join(format!("{} ({})", name, start_year)),
            version: None,
            total_issues: 50,
        }
    }

    /// Create a snatched regular issue.
    pub fn issue(id: &str, series_id: &str, number: &str, release_date: &str) -> CatalogIssue {
        CatalogIssue {
            id: id.to_string(),
            series_id: series_id.to_string(),
            issue_number: number.to_string(),
            release_date: Some(release_date.to_string()),
            status: IssueStatus::Snatched,
            kind: IssueKind::Regular,
        }
    }

    /// Create a snatched annual.
    pub fn annual(id: &str, series_id: &str, number: &str, release_date: &str) -> CatalogIssue {
        CatalogIssue {
            kind: IssueKind::Annual,
            ..issue(id, series_id, number, release_date)
        }
    }

    /// Create a tracking-log entry.
    pub fn tracking_entry(download_name: &str, issue_id: &str) -> TrackingLogEntry {
        TrackingLogEntry {
            download_name: download_name.to_string(),
            issue_id: issue_id.to_string(),
            story_arc: None,
            created_at: Utc::now(),
        }
    }

    /// Create a wanted reading-list entry.
    pub fn reading_list_entry(issue_arc_id: &str, arc_name: &str, order: u32) -> ReadingListEntry {
        ReadingListEntry {
            arc_id: format!("arc-{}", arc_name.to_lowercase().replace(' ', "-")),
            issue_arc_id: issue_arc_id.to_string(),
            arc_name: arc_name.to_string(),
            reading_order: order,
            status: IssueStatus::Wanted,
            location: None,
        }
    }

    /// Store a series, one of its issues and a tracking entry for it.
    pub fn seed_watchlist(
        catalog: &dyn ComicCatalog,
        download_name: &str,
        series: &CatalogSeries,
        issue: &CatalogIssue,
    ) {
        catalog.upsert_series(series).unwrap();
        catalog.upsert_issue(issue).unwrap();
        catalog
            .upsert_tracking_entry(&tracking_entry(download_name, &issue.id))
            .unwrap();
    }

    /// Write a small fake archive and return its path.
    pub fn write_archive(folder: &Path, file_name: &str) -> PathBuf {
        std::fs::create_dir_all(folder).unwrap();
        let path = folder.join(file_name);
        std::fs::write(&path, b"PK\x03\x04 not really a zip").unwrap();
        path
    }
}
