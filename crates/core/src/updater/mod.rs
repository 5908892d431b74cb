//! Post-download catalog updates: mark the issue downloaded and queue a
//! rescan of its series.

mod catalog;

pub use catalog::CatalogUpdater;

use crate::catalog::CatalogError;
use crate::issue::IssueKind;

/// Records that an issue arrived. Both operations are idempotent.
pub trait SeriesUpdater: Send + Sync {
    fn name(&self) -> &str;

    /// Mark an issue (or annual) as downloaded.
    fn mark_downloaded(&self, issue_id: &str, kind: IssueKind) -> Result<(), CatalogError>;

    /// Ask for the series' files to be rescanned.
    fn request_rescan(&self, series_id: &str) -> Result<(), CatalogError>;
}
