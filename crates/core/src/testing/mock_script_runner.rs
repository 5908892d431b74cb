//! Mock script runner for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::scripts::{ScriptArgs, ScriptError, ScriptOutput, ScriptRunner};

/// Mock implementation of the ScriptRunner trait. Records every
/// invocation and answers with a configurable output.
#[derive(Debug)]
pub struct MockScriptRunner {
    runs: Arc<RwLock<Vec<ScriptArgs>>>,
    output: Arc<RwLock<ScriptOutput>>,
}

impl Default for MockScriptRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl MockScriptRunner {
    pub fn new() -> Self {
        Self {
            runs: Arc::new(RwLock::new(Vec::new())),
            output: Arc::new(RwLock::new(ScriptOutput {
                exit_code: Some(0),
                output: String::new(),
            })),
        }
    }

    /// Answer every following run with this exit code and output.
    pub async fn set_output(&self, exit_code: i32, output: impl Into<String>) {
        *self.output.write().await = ScriptOutput {
            exit_code: Some(exit_code),
            output: output.into(),
        };
    }

    /// Arguments of every run so far.
    pub async fn recorded_runs(&self) -> Vec<ScriptArgs> {
        self.runs.read().await.clone()
    }

    pub async fn run_count(&self) -> usize {
        self.runs.read().await.len()
    }
}

#[async_trait]
impl ScriptRunner for MockScriptRunner {
    fn name(&self) -> &str {
        "mock"
    }

    async fn run(&self, args: ScriptArgs) -> Result<ScriptOutput, ScriptError> {
        self.runs.write().await.push(args);
        Ok(self.output.read().await.clone())
    }
}
