//! Mock relocator for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::relocator::{RelocateError, RelocationJob, RelocationResult, Relocator};

/// A recorded relocation job for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedRelocation {
    /// The job that was submitted.
    pub job: RelocationJob,
    /// Whether the relocation succeeded.
    pub success: bool,
}

/// Mock implementation of the Relocator trait.
///
/// Never touches the filesystem: a successful relocation reports the
/// planned destination as the final path.
///
/// # Example
///
/// ```rust,ignore
/// use shortbox_core::testing::MockRelocator;
///
/// let relocator = Arc::new(MockRelocator::new());
/// let processor = PostProcessor::new(&config, catalog, relocator.clone());
/// processor.process_download(job).await;
///
/// let relocations = relocator.recorded_relocations().await;
/// assert_eq!(relocations[0].job.destination.file_name, "Saga 005 (2013).cbz");
/// ```
#[derive(Debug, Default)]
pub struct MockRelocator {
    relocations: Arc<RwLock<Vec<RecordedRelocation>>>,
    next_error: Arc<RwLock<Option<RelocateError>>>,
}

impl MockRelocator {
    /// Create a new mock relocator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded relocations.
    pub async fn recorded_relocations(&self) -> Vec<RecordedRelocation> {
        self.relocations.read().await.clone()
    }

    /// Get the number of relocations attempted.
    pub async fn relocation_count(&self) -> usize {
        self.relocations.read().await.len()
    }

    /// Configure the next relocation to fail with the given error.
    pub async fn set_next_error(&self, error: RelocateError) {
        *self.next_error.write().await = Some(error);
    }
}

#[async_trait]
impl Relocator for MockRelocator {
    fn name(&self) -> &str {
        "mock"
    }

    async fn relocate(&self, job: RelocationJob) -> Result<RelocationResult, RelocateError> {
        if let Some(err) = self.next_error.write().await.take() {
            self.relocations.write().await.push(RecordedRelocation {
                job,
                success: false,
            });
            return Err(err);
        }

        let renamed_path = job
            .source
            .parent()
            .map(|p| p.join(&job.destination.file_name))
            .unwrap_or_else(|| job.destination.file_name.clone().into());
        let result = RelocationResult {
            renamed_path,
            final_path: job.destination.path(),
            size_bytes: 0,
            atomic: true,
            cleaned_up: job.cleanup_folder.is_some(),
            duration_ms: 0,
        };

        self.relocations.write().await.push(RecordedRelocation {
            job,
            success: true,
        });
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::Destination;
    use std::path::PathBuf;

    fn job() -> RelocationJob {
        RelocationJob::new(
            PathBuf::from("/dl/job/saga.005.cbz"),
            Destination {
                directory: PathBuf::from("/comics/Saga"),
                file_name: "Saga 005.cbz".to_string(),
            },
        )
    }

    #[tokio::test]
    async fn test_records_success() {
        let relocator = MockRelocator::new();
        let result = relocator.relocate(job()).await.unwrap();

        assert_eq!(result.renamed_path, PathBuf::from("/dl/job/Saga 005.cbz"));
        assert_eq!(result.final_path, PathBuf::from("/comics/Saga/Saga 005.cbz"));
        assert_eq!(relocator.relocation_count().await, 1);
    }

    #[tokio::test]
    async fn test_next_error_is_consumed() {
        let relocator = MockRelocator::new();
        relocator
            .set_next_error(RelocateError::SourceNotFound {
                path: PathBuf::from("/dl/job/saga.005.cbz"),
            })
            .await;

        assert!(relocator.relocate(job()).await.is_err());
        assert!(relocator.relocate(job()).await.is_ok());

        let recorded = relocator.recorded_relocations().await;
        assert!(!recorded[0].success);
        assert!(recorded[1].success);
    }
}
