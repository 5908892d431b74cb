//! Types for metadata tagging.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// What to tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRequest {
    /// Catalog issue ID the metadata comes from.
    pub issue_id: String,
    /// Folder holding the archive.
    pub folder: PathBuf,
    /// The exact archive, when known (manual runs). Otherwise the first
    /// archive in `folder` is used.
    pub file: Option<PathBuf>,
}

/// Result of a tagging attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TagOutcome {
    /// Metadata written. `path` is the archive to continue with, which may
    /// differ from the input after a format conversion.
    Tagged { path: PathBuf },
    /// Tagging failed; processing continues with the untagged file.
    Failed { reason: String },
    /// The archive is unreadable; processing stops.
    CorruptArchive { reason: String },
}

impl TagOutcome {
    pub fn is_corrupt(&self) -> bool {
        matches!(self, TagOutcome::CorruptArchive { .. })
    }
}
