//! Mock metadata tagger for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::scanner::first_archive;
use crate::tagger::{MetadataTagger, TagOutcome, TagRequest, TaggerError};

/// Mock implementation of the MetadataTagger trait.
///
/// By default every request is tagged in place: the outcome points at the
/// requested file, or the first archive in the requested folder.
#[derive(Debug, Default)]
pub struct MockTagger {
    requests: Arc<RwLock<Vec<TagRequest>>>,
    outcome: Arc<RwLock<Option<TagOutcome>>>,
}

impl MockTagger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every following request with `outcome`.
    pub async fn set_outcome(&self, outcome: TagOutcome) {
        *self.outcome.write().await = Some(outcome);
    }

    /// Get all recorded requests.
    pub async fn recorded_requests(&self) -> Vec<TagRequest> {
        self.requests.read().await.clone()
    }
}

#[async_trait]
impl MetadataTagger for MockTagger {
    fn name(&self) -> &str {
        "mock"
    }

    async fn tag(&self, request: TagRequest) -> Result<TagOutcome, TaggerError> {
        self.requests.write().await.push(request.clone());

        if let Some(outcome) = self.outcome.read().await.clone() {
            return Ok(outcome);
        }

        let path = match request.file {
            Some(file) => file,
            None => first_archive(&request.folder).ok_or(TaggerError::NoArchive {
                folder: request.folder,
            })?,
        };
        Ok(TagOutcome::Tagged { path })
    }
}
