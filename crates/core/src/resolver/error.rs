//! Error types for the resolver module.

use thiserror::Error;

use crate::catalog::CatalogError;
use crate::issue::IssueKind;

/// Errors that can occur while resolving a download.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// No tracking-log entry under any normalized form of the name.
    #[error("No tracking entry for download '{name}' (tried: {})", .attempts.join(", "))]
    Unresolvable { name: String, attempts: Vec<String> },

    /// The tracked issue ID is not in the catalog.
    #[error("Tracked {} issue {issue_id} is not in the catalog", .kind.as_str())]
    UnknownIssue { issue_id: String, kind: IssueKind },

    /// The tracked issue ID matches no known form.
    #[error("Unrecognized issue ID: {issue_id}")]
    UnrecognizedId { issue_id: String },

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

impl ResolveError {
    /// Whether this failure came from the catalog store rather than the data.
    pub fn is_catalog_failure(&self) -> bool {
        matches!(self, Self::Catalog(_))
    }
}
