//! Error types for building a post-processor.

use thiserror::Error;

use crate::notify::NotifyError;
use crate::scripts::ScriptError;

/// Errors while wiring collaborators from configuration. Runs themselves
/// never fail; see [`super::PostProcessReport`].
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("Script setup failed: {0}")]
    Script(#[from] ScriptError),

    #[error("Notifier setup failed: {0}")]
    Notify(#[from] NotifyError),
}
