//! Updater that writes straight to the catalog.

use std::sync::Arc;
use tracing::debug;

use super::SeriesUpdater;
use crate::catalog::{CatalogError, ComicCatalog, IssueStatus};
use crate::issue::IssueKind;

/// Updates issue status and the rescan queue in the catalog.
pub struct CatalogUpdater {
    catalog: Arc<dyn ComicCatalog>,
}

impl CatalogUpdater {
    pub fn new(catalog: Arc<dyn ComicCatalog>) -> Self {
        Self { catalog }
    }
}

impl SeriesUpdater for CatalogUpdater {
    fn name(&self) -> &str {
        "catalog"
    }

    fn mark_downloaded(&self, issue_id: &str, kind: IssueKind) -> Result<(), CatalogError> {
        debug!(issue_id, kind = kind.as_str(), "marking issue downloaded");
        self.catalog
            .set_issue_status(issue_id, kind, IssueStatus::Downloaded)
    }

    fn request_rescan(&self, series_id: &str) -> Result<(), CatalogError> {
        debug!(series_id, "requesting series rescan");
        self.catalog.request_rescan(series_id)
    }
}
