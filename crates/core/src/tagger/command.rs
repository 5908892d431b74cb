//! Tagger that shells out to an external program.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::process::Command;

use super::config::TaggingConfig;
use super::error::TaggerError;
use super::traits::MetadataTagger;
use super::types::{TagOutcome, TagRequest};
use crate::scanner::first_archive;

/// Runs the configured tagging program against one archive.
///
/// A zero exit status is a success. The archive to continue with is the
/// last line of stdout when it names an existing file (the program may have
/// converted the archive), otherwise the input archive.
pub struct CommandTagger {
    config: TaggingConfig,
}

impl CommandTagger {
    pub fn new(config: TaggingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TaggingConfig {
        &self.config
    }

    fn build_args(&self, issue_id: &str, file: &Path) -> Vec<String> {
        let file = file.to_string_lossy();
        let mut has_file = false;
        let mut args: Vec<String> = self
            .config
            .args
            .iter()
            .map(|arg| {
                if arg.contains("{file}") {
                    has_file = true;
                }
                arg.replace("{issue_id}", issue_id).replace("{file}", &file)
            })
            .collect();
        if !has_file {
            args.push(file.into_owned());
        }
        args
    }

    fn corrupt_line<'a>(&self, output: &'a str) -> Option<&'a str> {
        output.lines().find(|line| {
            let lower = line.to_lowercase();
            self.config
                .corrupt_markers
                .iter()
                .any(|marker| lower.contains(&marker.to_lowercase()))
        })
    }

    fn tagged_path(stdout: &str, original: &Path) -> PathBuf {
        stdout
            .lines()
            .rev()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(PathBuf::from)
            .filter(|candidate| candidate.is_file())
            .unwrap_or_else(|| original.to_path_buf())
    }
}

#[async_trait]
impl MetadataTagger for CommandTagger {
    fn name(&self) -> &str {
        "command"
    }

    async fn tag(&self, request: TagRequest) -> Result<TagOutcome, TaggerError> {
        let file = match request.file {
            Some(file) => file,
            None => first_archive(&request.folder).ok_or_else(|| TaggerError::NoArchive {
                folder: request.folder.clone(),
            })?,
        };

        let args = self.build_args(&request.issue_id, &file);
        tracing::debug!(
            program = %self.config.program.display(),
            ?args,
            "running tagger"
        );

        let output = Command::new(&self.config.program)
            .args(&args)
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    TaggerError::ProgramNotFound {
                        path: self.config.program.clone(),
                    }
                } else {
                    TaggerError::Io(e)
                }
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        if output.status.success() {
            return Ok(TagOutcome::Tagged {
                path: Self::tagged_path(&stdout, &file),
            });
        }

        let combined = format!("{}\n{}", stdout, stderr);
        if let Some(line) = self.corrupt_line(&combined) {
            return Ok(TagOutcome::CorruptArchive {
                reason: line.trim().to_string(),
            });
        }

        let last_line = combined
            .lines()
            .rev()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .unwrap_or("");
        Ok(TagOutcome::Failed {
            reason: format!(
                "tagger exited with code {:?}: {}",
                output.status.code(),
                last_line
            ),
        })
    }
}
