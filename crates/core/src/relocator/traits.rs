//! Trait definitions for the relocator module.

use async_trait::async_trait;

use super::error::RelocateError;
use super::types::{RelocationJob, RelocationResult};

/// Renames a file in place, moves it to its destination and tidies up.
#[async_trait]
pub trait Relocator: Send + Sync {
    /// Returns the name of this relocator implementation.
    fn name(&self) -> &str;

    /// Runs the relocation. Steps run in order and the first failure
    /// aborts; nothing already done is undone.
    async fn relocate(&self, job: RelocationJob) -> Result<RelocationResult, RelocateError>;
}
