//! Error types for the scanner module.

use std::path::PathBuf;
use thiserror::Error;

use crate::catalog::CatalogError;

/// Errors that can occur during a manual scan.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The folder to scan does not exist.
    #[error("Scan folder not found: {path}")]
    FolderNotFound { path: PathBuf },

    /// Walking the folder failed.
    #[error("Failed to walk {path}: {reason}")]
    Walk { path: PathBuf, reason: String },

    /// A matched file has no issue number the catalog knows.
    #[error("Ambiguous issue in {path} for series {series}: {detail}")]
    AmbiguousIssue {
        path: PathBuf,
        series: String,
        detail: String,
    },

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

impl ScanError {
    /// Creates an ambiguous-issue error.
    pub fn ambiguous(path: PathBuf, series: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::AmbiguousIssue {
            path,
            series: series.into(),
            detail: detail.into(),
        }
    }

    /// Whether the scan can continue past this error.
    pub fn is_skippable(&self) -> bool {
        matches!(self, Self::AmbiguousIssue { .. })
    }
}
