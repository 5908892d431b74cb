//! File system relocator implementation.

use async_trait::async_trait;
use std::path::Path;
use std::time::Instant;
use tokio::fs;

use super::config::RelocatorConfig;
use super::error::RelocateError;
use super::traits::Relocator;
use super::types::{RelocationJob, RelocationResult};
use crate::metrics;

/// File system based relocator implementation.
pub struct FsRelocator {
    config: RelocatorConfig,
}

impl FsRelocator {
    /// Creates a new file system relocator with the given configuration.
    pub fn new(config: RelocatorConfig) -> Self {
        Self { config }
    }

    /// Creates a relocator with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(RelocatorConfig::default())
    }

    /// Attempts to move a file atomically (rename).
    async fn try_atomic_move(source: &Path, destination: &Path) -> Result<bool, std::io::Error> {
        match fs::rename(source, destination).await {
            Ok(()) => Ok(true),
            Err(e) => {
                // Cross-filesystem moves fail with EXDEV (18 on Linux)
                if e.kind() == std::io::ErrorKind::CrossesDevices || e.raw_os_error() == Some(18) {
                    Ok(false)
                } else {
                    Err(e)
                }
            }
        }
    }

    /// Copies then removes the source.
    async fn copy_and_remove(source: &Path, destination: &Path) -> Result<(), std::io::Error> {
        fs::copy(source, destination).await?;
        fs::remove_file(source).await
    }

    /// Moves a file, falling back to copy across filesystems. An existing
    /// destination file is replaced.
    async fn move_file(&self, source: &Path, destination: &Path) -> Result<bool, RelocateError> {
        let fail = |e| RelocateError::move_failed(source.to_path_buf(), destination.to_path_buf(), e);

        if self.config.prefer_atomic_moves {
            if Self::try_atomic_move(source, destination).await.map_err(fail)? {
                return Ok(true);
            }
            tracing::debug!(
                source = %source.display(),
                destination = %destination.display(),
                "cross-device move, falling back to copy"
            );
        }

        Self::copy_and_remove(source, destination)
            .await
            .map_err(fail)?;
        Ok(false)
    }
}

#[async_trait]
impl Relocator for FsRelocator {
    fn name(&self) -> &str {
        "fs"
    }

    async fn relocate(&self, job: RelocationJob) -> Result<RelocationResult, RelocateError> {
        let start = Instant::now();

        let size_bytes = match fs::metadata(&job.source).await {
            Ok(meta) if meta.is_file() => meta.len(),
            _ => {
                return Err(RelocateError::SourceNotFound {
                    path: job.source.clone(),
                })
            }
        };

        let directory = &job.destination.directory;
        fs::create_dir_all(directory)
            .await
            .map_err(|e| RelocateError::DirectoryCreationFailed {
                path: directory.clone(),
                source: e,
            })?;

        // Rename next to the original first
        let renamed_path = match job.source.parent() {
            Some(parent) => parent.join(&job.destination.file_name),
            None => job.source.clone(),
        };
        if renamed_path != job.source {
            fs::rename(&job.source, &renamed_path).await.map_err(|e| {
                RelocateError::rename_failed(job.source.clone(), renamed_path.clone(), e)
            })?;
            tracing::debug!(
                from = %job.source.display(),
                to = %renamed_path.display(),
                "renamed in place"
            );
        }

        let final_path = job.destination.path();
        let atomic = if renamed_path == final_path {
            true
        } else {
            self.move_file(&renamed_path, &final_path).await?
        };
        metrics::FILES_RELOCATED.inc();
        tracing::info!(
            destination = %final_path.display(),
            size_bytes,
            "file moved"
        );

        let cleaned_up = match &job.cleanup_folder {
            Some(folder) => {
                fs::remove_dir_all(folder)
                    .await
                    .map_err(|e| RelocateError::CleanupFailed {
                        path: folder.clone(),
                        source: e,
                    })?;
                tracing::debug!(folder = %folder.display(), "removed download folder");
                true
            }
            None => false,
        };

        Ok(RelocationResult {
            renamed_path,
            final_path,
            size_bytes,
            atomic,
            cleaned_up,
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::Destination;
    use tempfile::TempDir;

    fn destination(directory: &Path, file_name: &str) -> Destination {
        Destination {
            directory: directory.to_path_buf(),
            file_name: file_name.to_string(),
        }
    }

    #[tokio::test]
    async fn test_relocate_renames_moves_and_cleans_up() {
        let temp = TempDir::new().unwrap();
        let download = temp.path().join("download");
        fs::create_dir_all(&download).await.unwrap();
        let source = download.join("saga.005.cbr");
        fs::write(&source, "comic").await.unwrap();
        let library = temp.path().join("library/Saga");

        let relocator = FsRelocator::with_defaults();
        let job = RelocationJob::new(source.clone(), destination(&library, "Saga 005 (2013).cbr"))
            .with_cleanup(download.clone());

        let result = relocator.relocate(job).await.unwrap();
        assert_eq!(result.final_path, library.join("Saga 005 (2013).cbr"));
        assert_eq!(result.renamed_path, download.join("Saga 005 (2013).cbr"));
        assert_eq!(result.size_bytes, 5);
        assert!(result.atomic);
        assert!(result.cleaned_up);
        assert!(result.final_path.exists());
        assert!(!download.exists());
    }

    #[tokio::test]
    async fn test_relocate_with_copy() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("in/a.cbz");
        fs::create_dir_all(source.parent().unwrap()).await.unwrap();
        fs::write(&source, "comic").await.unwrap();

        let relocator = FsRelocator::new(RelocatorConfig::default().with_atomic_moves(false));
        let job = RelocationJob::new(source.clone(), destination(&temp.path().join("out"), "b.cbz"));

        let result = relocator.relocate(job).await.unwrap();
        assert!(!result.atomic);
        assert!(!result.cleaned_up);
        assert!(temp.path().join("out/b.cbz").exists());
        assert!(!temp.path().join("in/b.cbz").exists());
        // Folder is kept without a cleanup request
        assert!(temp.path().join("in").exists());
    }

    #[tokio::test]
    async fn test_rename_only_reports_source_size() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("lib/saga.005.cbz");
        fs::create_dir_all(source.parent().unwrap()).await.unwrap();
        fs::write(&source, b"archive").await.unwrap();

        let relocator = FsRelocator::with_defaults();
        let result = relocator
            .relocate(RelocationJob::new(
                source.clone(),
                destination(&temp.path().join("lib"), "Saga 005 (2013).cbz"),
            ))
            .await
            .unwrap();

        assert_eq!(result.final_path, result.renamed_path);
        assert_eq!(result.size_bytes, 7);
        assert!(result.atomic);
        assert!(!source.exists());
    }

    #[tokio::test]
    async fn test_failed_move_leaves_file_renamed() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("in/a.cbz");
        fs::create_dir_all(source.parent().unwrap()).await.unwrap();
        fs::write(&source, "comic").await.unwrap();

        // Destination path is an occupied directory
        let out = temp.path().join("out");
        fs::create_dir_all(out.join("b.cbz/occupied")).await.unwrap();

        let relocator = FsRelocator::with_defaults();
        let job = RelocationJob::new(source.clone(), destination(&out, "b.cbz"))
            .with_cleanup(temp.path().join("in"));

        let err = relocator.relocate(job).await.unwrap_err();
        assert!(matches!(err, RelocateError::MoveFailed { .. }));
        assert!(!source.exists());
        assert!(temp.path().join("in/b.cbz").exists());
    }

    #[tokio::test]
    async fn test_missing_source() {
        let temp = TempDir::new().unwrap();
        let relocator = FsRelocator::with_defaults();
        let job = RelocationJob::new(
            temp.path().join("missing.cbz"),
            destination(temp.path(), "x.cbz"),
        );
        let err = relocator.relocate(job).await.unwrap_err();
        assert!(matches!(err, RelocateError::SourceNotFound { .. }));
    }

    #[tokio::test]
    async fn test_existing_destination_is_replaced() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("in/a.cbz");
        fs::create_dir_all(source.parent().unwrap()).await.unwrap();
        fs::write(&source, "new").await.unwrap();
        let out = temp.path().join("out");
        fs::create_dir_all(&out).await.unwrap();
        fs::write(out.join("a.cbz"), "old").await.unwrap();

        let relocator = FsRelocator::with_defaults();
        let job = RelocationJob::new(source, destination(&out, "a.cbz"));
        relocator.relocate(job).await.unwrap();

        let content = fs::read_to_string(out.join("a.cbz")).await.unwrap();
        assert_eq!(content, "new");
    }
}
