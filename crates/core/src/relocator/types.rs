//! Types for the relocator module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::planner::Destination;

/// A single relocation request.
#[derive(Debug, Clone)]
pub struct RelocationJob {
    /// File to relocate.
    pub source: PathBuf,
    /// Planned destination.
    pub destination: Destination,
    /// Folder removed recursively once the file has moved out of it.
    pub cleanup_folder: Option<PathBuf>,
}

impl RelocationJob {
    pub fn new(source: PathBuf, destination: Destination) -> Self {
        Self {
            source,
            destination,
            cleanup_folder: None,
        }
    }

    /// Removes `folder` after a successful move.
    pub fn with_cleanup(mut self, folder: PathBuf) -> Self {
        self.cleanup_folder = Some(folder);
        self
    }
}

/// Result of a successful relocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelocationResult {
    /// Path of the file after the in-place rename.
    pub renamed_path: PathBuf,
    /// Final path.
    pub final_path: PathBuf,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Whether the move was a single rename rather than a copy.
    pub atomic: bool,
    /// Whether a cleanup folder was removed.
    pub cleaned_up: bool,
    /// Duration in milliseconds.
    pub duration_ms: u64,
}
