//! Trait definitions for the tagger module.

use async_trait::async_trait;

use super::error::TaggerError;
use super::types::{TagOutcome, TagRequest};

/// Writes catalog metadata into a comic archive.
#[async_trait]
pub trait MetadataTagger: Send + Sync {
    /// Returns the name of this tagger implementation.
    fn name(&self) -> &str;

    /// Tags an archive. `Err` means the tagger could not run; callers treat
    /// it like [`TagOutcome::Failed`].
    async fn tag(&self, request: TagRequest) -> Result<TagOutcome, TaggerError>;
}
