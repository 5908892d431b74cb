//! Trait definitions for the scanner module.

use std::path::Path;

use super::error::ScanError;
use super::types::CandidateFile;
use crate::catalog::CatalogSeries;

/// Finds files under a folder that belong to a series.
pub trait SeriesFileMatcher: Send + Sync {
    /// Returns the name of this matcher implementation.
    fn name(&self) -> &str;

    /// Files whose names loosely match the series name or one of its
    /// alternates. The series' start year and issue count may be used as
    /// hints.
    fn find_candidates(
        &self,
        folder: &Path,
        series: &CatalogSeries,
    ) -> Result<Vec<CandidateFile>, ScanError>;
}
