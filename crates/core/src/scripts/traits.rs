//! Trait definitions for the scripts module.

use async_trait::async_trait;

use super::error::ScriptError;
use super::types::{ScriptArgs, ScriptOutput};

/// Runs a user script with run-specific arguments.
#[async_trait]
pub trait ScriptRunner: Send + Sync {
    /// Returns the name of this runner.
    fn name(&self) -> &str;

    /// Runs the script to completion. A non-zero exit is reported through
    /// [`ScriptOutput`], not as an error.
    async fn run(&self, args: ScriptArgs) -> Result<ScriptOutput, ScriptError>;
}
