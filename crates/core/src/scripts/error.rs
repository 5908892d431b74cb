//! Error types for the scripts module.

use thiserror::Error;

/// Errors that keep a script from running.
#[derive(Debug, Error)]
pub enum ScriptError {
    /// The configured command line could not be split.
    #[error("Invalid script command: {command}")]
    InvalidCommand { command: String },

    /// The script program does not exist.
    #[error("Script not found: {program}")]
    NotFound { program: String },

    /// I/O error while running the script.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
