//! Configuration for user scripts.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Pre/post-processing script settings.
///
/// Each script is a command line split with shell quoting rules; the run
/// arguments are appended after it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScriptsConfig {
    /// Runs after tagging, before the file is renamed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre_script: Option<String>,

    /// Runs after notifications, automatic runs only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_script: Option<String>,

    /// Working directory for scripts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<PathBuf>,
}
