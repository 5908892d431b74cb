//! Types for the post-process coordinator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::resolver::IssueRef;
use crate::scanner::SkippedFile;

/// Job name used for manual reconciliation runs.
pub const MANUAL_RUN: &str = "Manual Run";

/// Where a job came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobOrigin {
    /// A finished download handed over by the download client.
    Automatic,
    /// A folder of existing files matched against the whole catalog.
    Manual,
}

impl JobOrigin {
    pub fn as_str(self) -> &'static str {
        match self {
            JobOrigin::Automatic => "automatic",
            JobOrigin::Manual => "manual",
        }
    }
}

/// One unit of work for the coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadJob {
    /// Download name, or [`MANUAL_RUN`].
    pub name: String,
    /// Download folder (or single file) to process.
    pub folder: PathBuf,
    pub origin: JobOrigin,
}

impl DownloadJob {
    /// A job whose origin follows from its name: [`MANUAL_RUN`] means a
    /// manual run, anything else a finished download.
    pub fn new(name: impl Into<String>, folder: impl Into<PathBuf>) -> Self {
        let name = name.into();
        let origin = if name == MANUAL_RUN {
            JobOrigin::Manual
        } else {
            JobOrigin::Automatic
        };
        Self {
            name,
            folder: folder.into(),
            origin,
        }
    }

    pub fn automatic(name: impl Into<String>, folder: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            folder: folder.into(),
            origin: JobOrigin::Automatic,
        }
    }

    pub fn manual(folder: impl Into<PathBuf>) -> Self {
        Self {
            name: MANUAL_RUN.to_string(),
            folder: folder.into(),
            origin: JobOrigin::Manual,
        }
    }

    pub fn is_manual(&self) -> bool {
        self.origin == JobOrigin::Manual
    }
}

/// Coordinator states. The last state a run reaches is reported back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    Resolve,
    OneOffRoute,
    Normalize,
    TagMetadata,
    PlanDestination,
    Relocate,
    UpdateTracking,
    Notify,
    Done,
    // Terminal failures
    Unresolvable,
    CorruptArchive,
    MissingSourceFile,
    MoveFailed,
    CleanupFailed,
    CatalogUnavailable,
}

impl PipelineState {
    pub fn as_str(self) -> &'static str {
        match self {
            PipelineState::Resolve => "resolve",
            PipelineState::OneOffRoute => "one_off_route",
            PipelineState::Normalize => "normalize",
            PipelineState::TagMetadata => "tag_metadata",
            PipelineState::PlanDestination => "plan_destination",
            PipelineState::Relocate => "relocate",
            PipelineState::UpdateTracking => "update_tracking",
            PipelineState::Notify => "notify",
            PipelineState::Done => "done",
            PipelineState::Unresolvable => "unresolvable",
            PipelineState::CorruptArchive => "corrupt_archive",
            PipelineState::MissingSourceFile => "missing_source_file",
            PipelineState::MoveFailed => "move_failed",
            PipelineState::CleanupFailed => "cleanup_failed",
            PipelineState::CatalogUnavailable => "catalog_unavailable",
        }
    }

    pub fn is_terminal_failure(self) -> bool {
        matches!(
            self,
            PipelineState::Unresolvable
                | PipelineState::CorruptArchive
                | PipelineState::MissingSourceFile
                | PipelineState::MoveFailed
                | PipelineState::CleanupFailed
                | PipelineState::CatalogUnavailable
        )
    }
}

impl std::fmt::Display for PipelineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity of a run log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogLine {
    pub level: LogLevel,
    pub message: String,
    pub at: DateTime<Utc>,
}

/// Human-readable transcript of a run.
///
/// Every line is also emitted through `tracing` at the same level, tagged
/// with the job name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunLog {
    job: String,
    lines: Vec<LogLine>,
}

impl RunLog {
    pub fn new(job: impl Into<String>) -> Self {
        Self {
            job: job.into(),
            lines: Vec::new(),
        }
    }

    pub fn debug(&mut self, message: impl Into<String>) {
        self.push(LogLevel::Debug, message.into());
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(LogLevel::Info, message.into());
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.push(LogLevel::Warn, message.into());
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(LogLevel::Error, message.into());
    }

    fn push(&mut self, level: LogLevel, message: String) {
        let job = self.job.as_str();
        match level {
            LogLevel::Debug => tracing::debug!(job, "{}", message),
            LogLevel::Info => tracing::info!(job, "{}", message),
            LogLevel::Warn => tracing::warn!(job, "{}", message),
            LogLevel::Error => tracing::error!(job, "{}", message),
        }
        self.lines.push(LogLine {
            level,
            message,
            at: Utc::now(),
        });
    }

    pub fn lines(&self) -> &[LogLine] {
        &self.lines
    }

    /// Lines at warn level or above.
    pub fn problems(&self) -> impl Iterator<Item = &LogLine> {
        self.lines
            .iter()
            .filter(|l| matches!(l.level, LogLevel::Warn | LogLevel::Error))
    }

    pub fn contains(&self, fragment: &str) -> bool {
        self.lines.iter().any(|l| l.message.contains(fragment))
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Outcome of one coordinator pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostProcessReport {
    pub run_id: Uuid,
    pub job_name: String,
    pub origin: JobOrigin,
    /// `Done` or the terminal failure the run stopped in.
    pub state: PipelineState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue_ref: Option<IssueRef>,
    /// The file that was processed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<PathBuf>,
    /// Where the file ended up.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_path: Option<PathBuf>,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub log: RunLog,
}

impl PostProcessReport {
    pub fn succeeded(&self) -> bool {
        self.state == PipelineState::Done
    }

    pub fn final_path(&self) -> Option<&Path> {
        self.final_path.as_deref()
    }
}

/// Outcome of a manual reconciliation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManualRunReport {
    pub run_id: Uuid,
    pub folder: PathBuf,
    /// Files that matched a series and an issue.
    pub files_matched: usize,
    /// Series with no file in the folder.
    pub unmatched_series: usize,
    /// Files matched to a series whose issue could not be found.
    pub skipped: Vec<SkippedFile>,
    /// One report per candidate, in scan order.
    pub results: Vec<PostProcessReport>,
    pub log: RunLog,
}

impl ManualRunReport {
    pub fn processed(&self) -> usize {
        self.results.iter().filter(|r| r.succeeded()).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.processed()
    }
}

/// What [`super::PostProcessor::process`] produced for a job.
#[derive(Debug, Clone)]
pub enum ProcessOutcome {
    Download(PostProcessReport),
    Manual(ManualRunReport),
}

impl ProcessOutcome {
    /// True when every processed file reached `Done`.
    pub fn succeeded(&self) -> bool {
        match self {
            ProcessOutcome::Download(report) => report.succeeded(),
            ProcessOutcome::Manual(report) => report.failed() == 0,
        }
    }
}
