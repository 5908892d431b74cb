//! Types for destination planning.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where a file should end up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination {
    /// Target directory, created before the move.
    pub directory: PathBuf,
    /// Final file name, extension included.
    pub file_name: String,
}

impl Destination {
    /// Full destination path.
    pub fn path(&self) -> PathBuf {
        self.directory.join(&self.file_name)
    }
}
