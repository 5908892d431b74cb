//! Script runner that spawns the configured command line.

use async_trait::async_trait;
use std::path::PathBuf;
use tokio::process::Command;

use super::error::ScriptError;
use super::traits::ScriptRunner;
use super::types::{ScriptArgs, ScriptOutput};

/// Runs a command line split with shell quoting rules, run arguments
/// appended. No shell is involved.
pub struct ShellScriptRunner {
    program: String,
    base_args: Vec<String>,
    working_dir: Option<PathBuf>,
}

impl ShellScriptRunner {
    pub fn new(command: &str, working_dir: Option<PathBuf>) -> Result<Self, ScriptError> {
        let invalid = || ScriptError::InvalidCommand {
            command: command.to_string(),
        };
        let mut parts = shlex::split(command).ok_or_else(invalid)?;
        if parts.is_empty() {
            return Err(invalid());
        }
        let program = parts.remove(0);
        Ok(Self {
            program,
            base_args: parts,
            working_dir,
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

#[async_trait]
impl ScriptRunner for ShellScriptRunner {
    fn name(&self) -> &str {
        "shell"
    }

    async fn run(&self, args: ScriptArgs) -> Result<ScriptOutput, ScriptError> {
        let phase = args.phase();
        let mut command = Command::new(&self.program);
        command.args(&self.base_args).args(args.into_vec());
        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }

        tracing::debug!(program = %self.program, phase, "running script");

        let output = command.output().await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ScriptError::NotFound {
                    program: self.program.clone(),
                }
            } else {
                ScriptError::Io(e)
            }
        })?;

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));

        Ok(ScriptOutput {
            exit_code: output.status.code(),
            output: text,
        })
    }
}

/// Runner used when no script is configured.
#[derive(Debug, Clone, Default)]
pub struct NoOpScriptRunner;

#[async_trait]
impl ScriptRunner for NoOpScriptRunner {
    fn name(&self) -> &str {
        "noop"
    }

    async fn run(&self, _args: ScriptArgs) -> Result<ScriptOutput, ScriptError> {
        Ok(ScriptOutput {
            exit_code: Some(0),
            output: String::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn pre_args() -> ScriptArgs {
        ScriptArgs::Pre {
            job_name: "Saga.005".to_string(),
            job_folder: "/dl/Saga.005".to_string(),
            metadata: r#"{"seriesmeta":[]}"#.to_string(),
        }
    }

    #[test]
    fn test_new_splits_quoted_command() {
        let runner = ShellScriptRunner::new("python3 '/opt/my scripts/pre.py' -v", None).unwrap();
        assert_eq!(runner.program(), "python3");
        assert_eq!(runner.base_args, vec!["/opt/my scripts/pre.py", "-v"]);
    }

    #[test]
    fn test_new_rejects_bad_commands() {
        assert!(matches!(
            ShellScriptRunner::new("   ", None),
            Err(ScriptError::InvalidCommand { .. })
        ));
        assert!(matches!(
            ShellScriptRunner::new("sh 'unterminated", None),
            Err(ScriptError::InvalidCommand { .. })
        ));
    }

    #[tokio::test]
    async fn test_run_passes_arguments_and_combines_output() {
        let runner = ShellScriptRunner::new(
            r#"sh -c 'echo "$1|$2"; echo "$3" >&2; exit 3' script"#,
            None,
        )
        .unwrap();

        let output = runner.run(pre_args()).await.unwrap();
        assert!(!output.success());
        assert_eq!(output.exit_code, Some(3));
        assert_eq!(output.output, "Saga.005|/dl/Saga.005\n{\"seriesmeta\":[]}\n");
    }

    #[tokio::test]
    async fn test_run_in_working_dir() {
        let temp = TempDir::new().unwrap();
        let runner =
            ShellScriptRunner::new("sh -c 'pwd' script", Some(temp.path().to_path_buf())).unwrap();

        let output = runner.run(pre_args()).await.unwrap();
        assert!(output.success());
        let reported = std::fs::canonicalize(output.output.trim()).unwrap();
        assert_eq!(reported, std::fs::canonicalize(temp.path()).unwrap());
    }

    #[tokio::test]
    async fn test_missing_program() {
        let runner = ShellScriptRunner::new("/nonexistent/post.sh", None).unwrap();
        let result = runner.run(pre_args()).await;
        assert!(matches!(result, Err(ScriptError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_noop_runner() {
        let output = NoOpScriptRunner.run(pre_args()).await.unwrap();
        assert!(output.success());
        assert!(output.output.is_empty());
    }
}
