//! Configuration for metadata tagging.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Settings for the external tagging command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaggingConfig {
    /// Whether downloads are tagged before renaming.
    #[serde(default)]
    pub enabled: bool,

    /// Path to the tagging program.
    #[serde(default = "default_program")]
    pub program: PathBuf,

    /// Program arguments. `{issue_id}` and `{file}` are substituted; the
    /// archive path is appended when no argument mentions `{file}`.
    #[serde(default = "default_args")]
    pub args: Vec<String>,

    /// Output fragments (case-insensitive) that mark a failed run as a
    /// corrupt archive rather than a tagging failure.
    #[serde(default = "default_corrupt_markers")]
    pub corrupt_markers: Vec<String>,
}

fn default_program() -> PathBuf {
    PathBuf::from("comictagger")
}

fn default_args() -> Vec<String> {
    ["-s", "-t", "cr", "-o", "--id", "{issue_id}", "{file}"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_corrupt_markers() -> Vec<String> {
    vec!["unrar error".to_string(), "corrupt".to_string()]
}

impl Default for TaggingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            program: default_program(),
            args: default_args(),
            corrupt_markers: default_corrupt_markers(),
        }
    }
}

impl TaggingConfig {
    /// Uses the given program with tagging enabled.
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.enabled = true;
        self.program = program.into();
        self
    }

    /// Sets the program arguments.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }
}
