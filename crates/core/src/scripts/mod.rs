//! User pre/post-processing scripts.
//!
//! The pre-script runs after tagging and before the file is renamed. The
//! post-script runs after notifications on automatic runs. Both receive the
//! job name and folder plus a JSON metadata payload as their last argument.
//! Script failures are logged and never stop a run.

mod config;
mod error;
mod shell;
mod traits;
mod types;

pub use config::ScriptsConfig;
pub use error::ScriptError;
pub use shell::{NoOpScriptRunner, ShellScriptRunner};
pub use traits::ScriptRunner;
pub use types::{ScriptArgs, ScriptMetadata, ScriptOutput, SeriesMeta};
