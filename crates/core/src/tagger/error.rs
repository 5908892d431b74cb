//! Error types for the tagger module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that keep the tagger from running at all.
#[derive(Debug, Error)]
pub enum TaggerError {
    /// Tagging program not found.
    #[error("Tagging program not found at path: {path}")]
    ProgramNotFound { path: PathBuf },

    /// No archive to tag.
    #[error("No .cbr/.cbz archive found in {folder}")]
    NoArchive { folder: PathBuf },

    /// I/O error while running the program.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
