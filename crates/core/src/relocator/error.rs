//! Error types for the relocator module.

use std::path::PathBuf;
use thiserror::Error;

use crate::postprocess::PipelineState;

/// Errors that can occur while relocating a file.
#[derive(Debug, Error)]
pub enum RelocateError {
    /// Source file not found.
    #[error("Source file not found: {path}")]
    SourceNotFound { path: PathBuf },

    /// Failed to create destination directory.
    #[error("Failed to create directory: {path}")]
    DirectoryCreationFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to rename the file in place.
    #[error("Failed to rename {source} to {destination}")]
    RenameFailed {
        source: PathBuf,
        destination: PathBuf,
        #[source]
        error: std::io::Error,
    },

    /// Failed to move the renamed file.
    #[error("Failed to move file from {source} to {destination}")]
    MoveFailed {
        source: PathBuf,
        destination: PathBuf,
        #[source]
        error: std::io::Error,
    },

    /// Failed to remove the download folder after the move.
    #[error("Failed to remove download folder: {path}")]
    CleanupFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl RelocateError {
    /// Creates a rename failed error.
    pub fn rename_failed(source: PathBuf, destination: PathBuf, error: std::io::Error) -> Self {
        Self::RenameFailed {
            source,
            destination,
            error,
        }
    }

    /// Creates a move failed error.
    pub fn move_failed(source: PathBuf, destination: PathBuf, error: std::io::Error) -> Self {
        Self::MoveFailed {
            source,
            destination,
            error,
        }
    }

    /// The pipeline state a run ends in when relocation fails this way.
    pub fn terminal_state(&self) -> PipelineState {
        match self {
            Self::SourceNotFound { .. } => PipelineState::MissingSourceFile,
            Self::CleanupFailed { .. } => PipelineState::CleanupFailed,
            Self::DirectoryCreationFailed { .. }
            | Self::RenameFailed { .. }
            | Self::MoveFailed { .. } => PipelineState::MoveFailed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        let io = || std::io::Error::other("boom");
        assert_eq!(
            RelocateError::SourceNotFound {
                path: PathBuf::from("/a")
            }
            .terminal_state(),
            PipelineState::MissingSourceFile
        );
        assert_eq!(
            RelocateError::move_failed(PathBuf::from("/a"), PathBuf::from("/b"), io())
                .terminal_state(),
            PipelineState::MoveFailed
        );
        assert_eq!(
            RelocateError::DirectoryCreationFailed {
                path: PathBuf::from("/b"),
                source: io(),
            }
            .terminal_state(),
            PipelineState::MoveFailed
        );
        assert_eq!(
            RelocateError::CleanupFailed {
                path: PathBuf::from("/a"),
                source: io(),
            }
            .terminal_state(),
            PipelineState::CleanupFailed
        );
    }
}
